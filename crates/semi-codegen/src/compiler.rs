//! Compilation driver and the state shared by the section parsers.
//!
//! Both parsers are `impl Compiler` blocks in their own modules
//! ([`crate::data`] and [`crate::stmt`]); this module owns the character
//! stream, the register table, the emitter and the operand readers.

use semi_lexer::{CharStream, LexError, SourceChar};
use semi_runtime::c_runtime;
use semi_types::{
    ErrorCode, Register, RegisterError, RegisterKind, RegisterTable, Result, SemiError,
    SourceFile, Span,
};

use crate::emitter::Emitter;
use crate::{CLOSER, JOIN_CLOSER, SECTION_MARKER};

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// The output of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    /// The complete C translation unit.
    pub c_source: String,
    /// Final type-state of every register.
    pub registers: RegisterTable,
}

/// Compile a Semi source file to a C translation unit.
pub fn compile(source_file: &SourceFile) -> Result<String> {
    compile_program(source_file).map(|p| p.c_source)
}

/// Compile and also return the final register table.
pub fn compile_program(source_file: &SourceFile) -> Result<CompiledProgram> {
    Compiler::new(source_file).run()
}

// ══════════════════════════════════════════════════════════════════════════════
// Compiler
// ══════════════════════════════════════════════════════════════════════════════

/// Which kind of code section is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionMode {
    Single,
    Loop,
}

pub struct Compiler<'src> {
    pub(crate) source_file: &'src SourceFile,
    pub(crate) stream: CharStream<'src>,
    pub(crate) registers: RegisterTable,
    pub(crate) out: Emitter,
    pub(crate) mode: SectionMode,
    /// Conditionals opened but not yet closed, innermost last. `true` once
    /// the conditional has an else branch.
    pub(crate) conditionals: Vec<bool>,
    /// Open conditionals when the current Loop section was entered.
    pub(crate) loop_base: usize,
}

impl<'src> Compiler<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source_file,
            stream: CharStream::new(source_file),
            registers: RegisterTable::new(),
            out: Emitter::new(),
            mode: SectionMode::Single,
            conditionals: Vec::new(),
            loop_base: 0,
        }
    }

    /// Run the full single pass.
    pub fn run(mut self) -> Result<CompiledProgram> {
        self.emit_prologue();
        self.parse_data_section()?;
        self.parse_code_sections()?;
        self.emit_epilogue();
        Ok(CompiledProgram {
            c_source: self.out.finish(),
            registers: self.registers,
        })
    }

    fn emit_prologue(&mut self) {
        self.out.raw(&c_runtime::render());
        self.out.raw("\n");
        self.out.open("int main(int argc, char** argv) {");
        self.out.line("FILE* istream = stdin;");
        self.out.line("FILE* ostream = stdout;");
        self.out.line(format!("int {} = 0;", Register::NUMBER_ACC.c_name()));
        self.out.line(format!(
            "semi_buf* {} = {}(1);",
            Register::STRING_ACC.c_name(),
            c_runtime::names::NEW
        ));
        self.out.line("(void) argc;");
        self.out.line("(void) argv;");
    }

    /// Release every String register, then return from `main`.
    fn emit_epilogue(&mut self) {
        let strings: Vec<Register> = self.registers.strings().collect();
        for reg in strings {
            self.out
                .line(format!("{}({});", c_runtime::names::FREE, reg.c_name()));
        }
        self.out.line("return 0;");
        self.out.close();
    }

    // ── Errors ───────────────────────────────────────────────────────────

    pub(crate) fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> SemiError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        SemiError::new(&self.source_file.name, code, message, span, source_line)
    }

    pub(crate) fn register_error(&self, err: RegisterError, span: Span) -> SemiError {
        let suggestion = match &err {
            RegisterError::Undeclared(c) => Some(format!(
                "declare `{c}` in the data section, e.g. `{c}n0` or `{c}s0`"
            )),
            _ => None,
        };
        let error = self.error(err.code(), err.to_string(), span);
        match suggestion {
            Some(s) => error.with_suggestion(s),
            None => error,
        }
    }

    fn lex_error(&self, err: LexError) -> SemiError {
        self.error(err.code(), err.to_string(), err.span())
    }

    pub(crate) fn type_mismatch(
        &self,
        reg: Register,
        expected: RegisterKind,
        actual: RegisterKind,
        span: Span,
    ) -> SemiError {
        let err = RegisterError::TypeMismatch {
            register: reg.to_char(),
            expected,
            actual,
        };
        self.register_error(err, span)
    }

    pub(crate) fn not_implemented(&self, what: &str, reg: Register, span: Span) -> SemiError {
        self.error(
            ErrorCode::NOT_IMPLEMENTED,
            format!("Not yet implemented: {what} for register `{reg}`"),
            span,
        )
    }

    /// Digit registers are emitted as C literals and cannot be written.
    pub(crate) fn constant_target(&self, reg: Register, span: Span) -> SemiError {
        self.error(
            ErrorCode::CONSTANT_TARGET,
            format!("Cannot write to constant register `{reg}`"),
            span,
        )
    }

    // ── Stream helpers ───────────────────────────────────────────────────

    pub(crate) fn next_char(&mut self) -> Option<SourceChar> {
        self.stream.next_significant()
    }

    pub(crate) fn push_back(&mut self, c: SourceChar) -> Result<()> {
        self.stream.push_back(c).map_err(|e| self.lex_error(e))
    }

    /// Where an "end of input" error should point.
    pub(crate) fn eof_span(&self) -> Span {
        self.stream.position()
    }

    // ── Register operands ────────────────────────────────────────────────

    pub(crate) fn kind_of(&self, reg: Register, span: Span) -> Result<RegisterKind> {
        self.registers
            .kind_of(reg)
            .map_err(|e| self.register_error(e, span))
    }

    /// Read a register name of any declared type.
    pub(crate) fn read_any_register(&mut self) -> Result<(Register, RegisterKind, Span)> {
        let Some(c) = self.next_char() else {
            return Err(self.error(
                ErrorCode::EXPECTED_REGISTER,
                "Expected register name (got end of input)",
                self.eof_span(),
            ));
        };
        let reg = Register::parse(c.byte).map_err(|e| self.register_error(e, c.span))?;
        let kind = self.kind_of(reg, c.span)?;
        Ok((reg, kind, c.span))
    }

    /// Strict read: the register must already hold `expected`.
    pub(crate) fn read_register(&mut self, expected: RegisterKind) -> Result<Register> {
        let (reg, actual, span) = self.read_any_register()?;
        if actual != expected {
            return Err(self.type_mismatch(reg, expected, actual, span));
        }
        Ok(reg)
    }

    /// Continuation read for an optional output operand.
    ///
    /// When the next character is not a register name, the accumulator for
    /// `expected` is used instead. The character is pushed back and, unless
    /// it is a section or block marker, the accumulator is pushed back in
    /// front of it so the next statement continues from the result.
    /// An explicit output register must be writable.
    pub(crate) fn read_register_cons(&mut self, expected: RegisterKind) -> Result<Register> {
        let acc = Register::accumulator(expected);
        let Some(c) = self.next_char() else {
            return Ok(acc);
        };
        match Register::from_char(c.byte) {
            Some(reg) => {
                let actual = self.kind_of(reg, c.span)?;
                if actual != expected {
                    return Err(self.type_mismatch(reg, expected, actual, c.span));
                }
                if reg.is_digit() {
                    return Err(self.constant_target(reg, c.span));
                }
                Ok(reg)
            }
            None => {
                self.push_back(c)?;
                if !matches!(c.byte, SECTION_MARKER | CLOSER | JOIN_CLOSER) {
                    self.push_back(SourceChar::new(acc.to_char() as u8, c.span))?;
                }
                Ok(acc)
            }
        }
    }
}
