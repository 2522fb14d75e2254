//! Code-section parsing and statement code generation.
//!
//! Sections after the data section alternate between straight-line code
//! (`Single`) and `while` loops (`Loop`). Each statement is a register, a
//! command character and the command's operands; what gets emitted depends
//! on the register's type.

use semi_runtime::c_runtime::names;
use semi_types::{ErrorCode, Register, RegisterKind, Result, Span};

use crate::command::{BinaryOp, Command, UnaryOp};
use crate::compiler::{Compiler, SectionMode};
use crate::{CLOSER, JOIN_CLOSER, SECTION_MARKER};

use semi_types::RegisterKind::{Number, String as Str};

/// Standard streams are never closed by the generated program.
fn is_file_stream(stream: &str) -> String {
    format!("{stream} != stdin && {stream} != stdout && {stream} != stderr")
}

impl<'src> Compiler<'src> {
    /// Parse every section after the data section.
    pub(crate) fn parse_code_sections(&mut self) -> Result<()> {
        while let Some(c) = self.next_char() {
            match c.byte {
                SECTION_MARKER => self.toggle_section(c.span)?,
                CLOSER => self.close_conditional(c.span)?,
                JOIN_CLOSER => self.else_branch(c.span)?,
                _ => {
                    let reg = Register::parse(c.byte).map_err(|e| self.register_error(e, c.span))?;
                    let kind = self.kind_of(reg, c.span)?;
                    self.statement(reg, kind, c.span)?;
                }
            }
        }

        if self.mode == SectionMode::Loop {
            self.leave_loop(self.eof_span())?;
        }
        if !self.conditionals.is_empty() {
            return Err(self.error(
                ErrorCode::UNCLOSED_CONDITIONAL,
                format!(
                    "{} conditional(s) still open at end of input",
                    self.conditionals.len()
                ),
                self.eof_span(),
            ));
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Block structure
    // ══════════════════════════════════════════════════════════════════════

    fn toggle_section(&mut self, span: Span) -> Result<()> {
        match self.mode {
            SectionMode::Single => {
                let test = self.read_register(Number)?;
                self.out.open(format!("while({}) {{", test.c_name()));
                self.loop_base = self.conditionals.len();
                self.mode = SectionMode::Loop;
            }
            SectionMode::Loop => self.leave_loop(span)?,
        }
        Ok(())
    }

    fn leave_loop(&mut self, span: Span) -> Result<()> {
        if self.conditionals.len() != self.loop_base {
            return Err(self.error(
                ErrorCode::UNCLOSED_CONDITIONAL,
                "Conditional opened inside a loop section must be closed before the section ends",
                span,
            ));
        }
        self.out.close();
        self.mode = SectionMode::Single;
        Ok(())
    }

    /// Conditionals the current section may close.
    fn closable(&self) -> usize {
        match self.mode {
            SectionMode::Single => self.conditionals.len(),
            SectionMode::Loop => self.conditionals.len() - self.loop_base,
        }
    }

    fn close_conditional(&mut self, span: Span) -> Result<()> {
        if self.closable() == 0 {
            return Err(self.error(
                ErrorCode::UNEXPECTED_CLOSER,
                format!("Unexpected closer `{}`", CLOSER as char),
                span,
            ));
        }
        self.conditionals.pop();
        self.out.close();
        Ok(())
    }

    fn else_branch(&mut self, span: Span) -> Result<()> {
        if self.closable() == 0 {
            return Err(self.error(
                ErrorCode::UNEXPECTED_CLOSER,
                format!("Unexpected join-closer `{}`", JOIN_CLOSER as char),
                span,
            ));
        }
        if let Some(has_else) = self.conditionals.last_mut() {
            if *has_else {
                return Err(self.error(
                    ErrorCode::UNEXPECTED_CLOSER,
                    "Conditional already has an else branch",
                    span,
                ));
            }
            *has_else = true;
        }
        self.out.reopen("} else {");
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn statement(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        let Some(c) = self.next_char() else {
            return Err(self.error(
                ErrorCode::UNKNOWN_COMMAND,
                format!("Unknown command (got end of input) for `{reg}`"),
                self.eof_span(),
            ));
        };
        let Some(command) = Command::from_byte(c.byte) else {
            return Err(self.error(
                ErrorCode::UNKNOWN_COMMAND,
                format!("Unknown command `{}` for `{reg}`", c.display()),
                c.span,
            ));
        };

        match command {
            Command::Binary(op) => self.emit_binary(op, reg, kind, span),
            Command::Unary(op) => self.emit_unary(op, reg, kind, span),
            Command::Assign => self.emit_assign(reg, kind, span),
            Command::CharAt => self.emit_char_at(reg, kind, span),
            Command::CharSet => self.emit_char_set(reg, kind, span),
            Command::ArgLoad => self.emit_arg_load(reg, kind, span),
            Command::Put => {
                let line = match kind {
                    Number => format!("fputc({}, ostream);", reg.c_name()),
                    Str => format!("{}({}, ostream);", names::WRITE, reg.c_name()),
                };
                self.out.line(line);
                Ok(())
            }
            Command::Debug => {
                self.emit_debug(reg, kind);
                Ok(())
            }
            Command::Exit => match kind {
                Number => {
                    self.out.line(format!("return {};", reg.c_name()));
                    Ok(())
                }
                Str => Err(self.not_implemented("exit", reg, span)),
            },
            Command::InputStream => self.emit_stream_select(reg, kind, "istream", "stdin"),
            Command::OutputStream => self.emit_stream_select(reg, kind, "ostream", "stdout"),
            Command::GetChar => self.emit_get_char(reg, kind, span),
            Command::Input => self.emit_input(reg, kind, span),
            Command::Resize => {
                self.expect_string(reg, kind, span)?;
                let length = self.read_register(Number)?;
                self.out.line(format!(
                    "{}({}, {});",
                    names::RESIZE,
                    reg.c_name(),
                    length.c_name()
                ));
                Ok(())
            }
            Command::Size => {
                self.expect_string(reg, kind, span)?;
                let out = self.read_register_cons(Number)?;
                self.out
                    .line(format!("{} = (int) {}->size;", out.c_name(), reg.c_name()));
                Ok(())
            }
            Command::Print => {
                let line = match kind {
                    Number => format!("fprintf(ostream, \"%i\\n\", {});", reg.c_name()),
                    Str => format!("{}({}, ostream);", names::PRINT, reg.c_name()),
                };
                self.out.line(line);
                Ok(())
            }
            Command::If => match kind {
                Number => {
                    self.out.open(format!("if({}) {{", reg.c_name()));
                    self.conditionals.push(false);
                    Ok(())
                }
                Str => Err(self.not_implemented("conditional", reg, span)),
            },
        }
    }

    fn expect_string(&self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        if kind != Str {
            return Err(self.type_mismatch(reg, Str, kind, span));
        }
        Ok(())
    }

    fn expect_number(&self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        if kind != Number {
            return Err(self.type_mismatch(reg, Number, kind, span));
        }
        Ok(())
    }

    fn expect_writable(&self, reg: Register, span: Span) -> Result<()> {
        if reg.is_digit() {
            return Err(self.constant_target(reg, span));
        }
        Ok(())
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    fn emit_binary(&mut self, op: BinaryOp, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        match kind {
            Number => {
                let rhs = self.read_register(Number)?;
                let out = self.read_register_cons(Number)?;
                self.out.line(format!(
                    "{} = {} {} {};",
                    out.c_name(),
                    reg.c_name(),
                    op.c_operator(),
                    rhs.c_name()
                ));
            }
            Str if op == BinaryOp::Add => {
                let (rhs, rhs_kind, _) = self.read_any_register()?;
                let out = self.read_register_cons(Str)?;
                if out != reg {
                    self.out.line(format!(
                        "{}({}, {});",
                        names::COPY_TO,
                        out.c_name(),
                        reg.c_name()
                    ));
                }
                let append = match rhs_kind {
                    Str => names::APPEND,
                    Number => names::APPEND_CHAR,
                };
                self.out
                    .line(format!("{append}({}, {});", out.c_name(), rhs.c_name()));
            }
            Str => return Err(self.type_mismatch(reg, Number, kind, span)),
        }
        Ok(())
    }

    fn emit_unary(&mut self, op: UnaryOp, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        self.expect_number(reg, kind, span)?;
        let out = self.read_register_cons(Number)?;
        self.out.line(format!(
            "{} = {}{};",
            out.c_name(),
            op.c_operator(),
            reg.c_name()
        ));
        Ok(())
    }

    fn emit_assign(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        self.expect_writable(reg, span)?;
        let from = self.read_register(kind)?;
        let line = match kind {
            Number => format!("{} = {};", reg.c_name(), from.c_name()),
            Str => format!("{}({}, {});", names::COPY_TO, reg.c_name(), from.c_name()),
        };
        self.out.line(line);
        Ok(())
    }

    // ── Buffer access ────────────────────────────────────────────────────

    fn emit_char_at(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        self.expect_string(reg, kind, span)?;
        let index = self.read_register(Number)?;
        let out = self.read_register_cons(Number)?;
        self.out.line(format!(
            "{} = {}({}, {});",
            out.c_name(),
            names::GET,
            reg.c_name(),
            index.c_name()
        ));
        Ok(())
    }

    fn emit_char_set(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        self.expect_string(reg, kind, span)?;
        let index = self.read_register(Number)?;
        let value = self.read_register(Number)?;
        self.out.line(format!(
            "{}({}, {}, {});",
            names::SET,
            reg.c_name(),
            index.c_name(),
            value.c_name()
        ));
        Ok(())
    }

    /// Replace the buffer with a copy of `argv[index]`, or an empty buffer
    /// when the index is out of range.
    fn emit_arg_load(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        if kind == Number {
            return Err(self.not_implemented("argument load", reg, span));
        }
        let index = self.read_register(Number)?;
        let (name, i) = (reg.c_name(), index.c_name());
        self.out.line(format!("{}({name});", names::FREE));
        self.out.line(format!(
            "{name} = {}({i} >= 0 && {i} < argc ? argv[{i}] : \"\");",
            names::FROM
        ));
        Ok(())
    }

    // ── I/O ──────────────────────────────────────────────────────────────

    fn emit_debug(&mut self, reg: Register, kind: RegisterKind) {
        let label = format!("REGISTER '{}' = ", reg.to_char());
        match kind {
            Number => self.out.line(format!(
                "fprintf(stderr, \"{label}%i\\n\", {});",
                reg.c_name()
            )),
            Str => {
                self.out.line(format!("fputs(\"{label}\", ostream);"));
                self.out
                    .line(format!("{}({}, ostream);", names::PRINT, reg.c_name()));
            }
        }
    }

    /// `f` / `F`: a String names a file to open with a mode register; a
    /// Number selects a standard stream.
    fn emit_stream_select(
        &mut self,
        reg: Register,
        kind: RegisterKind,
        stream: &str,
        default: &str,
    ) -> Result<()> {
        let close = format!("if({}) fclose({stream});", is_file_stream(stream));
        match kind {
            Str => {
                let mode = self.read_register(Number)?;
                self.out.open(format!("if({}) {{", mode.c_name()));
                self.out.line(format!(
                    "FILE* semi_next = fopen({}({}), {}({}));",
                    names::CSTR,
                    reg.c_name(),
                    names::FILE_MODE,
                    mode.c_name()
                ));
                self.out.open("if(semi_next != NULL) {");
                self.out.line(&close);
                self.out.line(format!("{stream} = semi_next;"));
                self.out.close();
                self.out.reopen("} else {");
                self.out.line(&close);
                self.out.line(format!("{stream} = {default};"));
                self.out.close();
            }
            Number => {
                self.out.line(&close);
                let target = if stream == "ostream" {
                    format!("{} == 2 ? stderr : stdout", reg.c_name())
                } else {
                    default.to_string()
                };
                self.out.line(format!("{stream} = {target};"));
            }
        }
        Ok(())
    }

    fn emit_get_char(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        self.expect_writable(reg, span)?;
        let line = match kind {
            Number => format!("{} = fgetc(istream);", reg.c_name()),
            Str => format!("{}({}, 0, fgetc(istream));", names::SET, reg.c_name()),
        };
        self.out.line(line);
        Ok(())
    }

    fn emit_input(&mut self, reg: Register, kind: RegisterKind, span: Span) -> Result<()> {
        self.expect_writable(reg, span)?;
        let name = reg.c_name();
        let line = match kind {
            Number => format!("(void) scanf(\" %i\", &{name});"),
            Str => format!(
                "if({name}->size > 0 && fgets((char*) {name}->data, (int) {name}->size, stdin) == NULL) {name}->data[0] = 0;"
            ),
        };
        self.out.line(line);
        Ok(())
    }
}
