//! Data-section parsing.
//!
//! ```text
//! declaration := register mode payload
//! mode        := 's' | 'n'
//! payload     := '-'? digit{1,10}              (mode n)
//!              | digit{1,10} byte{0,N} '.'?    (mode s, N = the digits)
//! ```
//!
//! Declarations repeat until the first section marker or end of input.

use semi_lexer::SourceChar;
use semi_runtime::c_runtime::names;
use semi_types::{ErrorCode, Register, RegisterKind, Result, Span};

use crate::compiler::Compiler;
use crate::{LITERAL_TERMINATOR, SECTION_MARKER};

/// Longest digit run accepted in a declaration.
pub const MAX_DIGITS: usize = 10;

/// A parsed integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLiteral {
    pub value: i64,
    pub span: Span,
    /// The digits were followed directly by a section marker.
    pub ends_section: bool,
}

impl<'src> Compiler<'src> {
    /// Parse declarations up to and including the first section marker.
    pub(crate) fn parse_data_section(&mut self) -> Result<()> {
        while let Some(c) = self.next_char() {
            if c.byte == SECTION_MARKER {
                break;
            }
            self.parse_declaration(c)?;
        }
        Ok(())
    }

    fn parse_declaration(&mut self, name: SourceChar) -> Result<()> {
        let reg = Register::from_char(name.byte)
            .filter(|r| r.is_alphabetic())
            .ok_or_else(|| {
                self.error(
                    ErrorCode::EXPECTED_REGISTER,
                    format!("Expected register name (got `{}`)", name.display()),
                    name.span,
                )
            })?;
        let kind = self.read_mode()?;
        let literal = self.read_int_literal()?;
        self.registers
            .declare(reg, kind)
            .map_err(|e| self.register_error(e, name.span))?;

        match kind {
            RegisterKind::Number => {
                self.out
                    .line(format!("int {} = {};", reg.c_name(), literal.value));
            }
            RegisterKind::String => self.emit_string_declaration(reg, literal)?,
        }
        Ok(())
    }

    fn read_mode(&mut self) -> Result<RegisterKind> {
        let Some(c) = self.next_char() else {
            return Err(self.error(
                ErrorCode::EXPECTED_MODE,
                "Expected mode 's' or 'n' (got end of input)",
                self.eof_span(),
            ));
        };
        match c.byte {
            b's' => Ok(RegisterKind::String),
            b'n' => Ok(RegisterKind::Number),
            _ => Err(self.error(
                ErrorCode::EXPECTED_MODE,
                format!("Expected mode 's' or 'n' (got `{}`)", c.display()),
                c.span,
            )),
        }
    }

    /// Read an optionally negative decimal literal of 1 to 10 digits that
    /// fits in a C `int`.
    ///
    /// The character that ends the literal is pushed back.
    fn read_int_literal(&mut self) -> Result<IntLiteral> {
        let start = self.eof_span();
        let mut negative = false;
        let mut span = None;
        if let Some(c) = self.next_char() {
            if c.byte == b'-' {
                negative = true;
                span = Some(c.span);
            } else {
                self.push_back(c)?;
            }
        }

        let mut value: i64 = 0;
        let mut digits = 0;
        let mut last = start;
        let mut end = None;
        loop {
            let Some(c) = self.next_char() else {
                break;
            };
            if !c.byte.is_ascii_digit() {
                end = Some(c);
                break;
            }
            if digits == MAX_DIGITS {
                return Err(self.error(
                    ErrorCode::LITERAL_TOO_LONG,
                    format!("Postfix number cannot exceed {MAX_DIGITS} digits"),
                    c.span,
                ));
            }
            if span.is_none() {
                span = Some(c.span);
            }
            value = value * 10 + i64::from(c.byte - b'0');
            digits += 1;
            last = c.span;
        }

        if digits == 0 {
            let (got, at) = match end {
                Some(c) => (format!("`{}`", c.display()), c.span),
                None => ("end of input".to_string(), self.eof_span()),
            };
            return Err(self.error(
                ErrorCode::EXPECTED_DIGIT,
                format!("Expected at least 1 digit after declaration (got {got})"),
                at,
            ));
        }
        let value = if negative { -value } else { value };
        let span = span.unwrap_or(start).to(last);
        if i32::try_from(value).is_err() {
            return Err(self.error(
                ErrorCode::LITERAL_TOO_LONG,
                format!("Number literal `{value}` does not fit in a 32-bit int"),
                span,
            ));
        }
        let ends_section = end.is_some_and(|c| c.byte == SECTION_MARKER);
        if let Some(c) = end {
            self.push_back(c)?;
        }

        Ok(IntLiteral {
            value,
            span,
            ends_section,
        })
    }

    /// Emit a buffer sized for `length + 1` bytes, then one store per
    /// literal byte read raw from the source. A length followed by the
    /// section marker has no payload.
    fn emit_string_declaration(&mut self, reg: Register, length: IntLiteral) -> Result<()> {
        if length.value < 0 {
            return Err(self.error(
                ErrorCode::NEGATIVE_LENGTH,
                format!(
                    "String length cannot be negative (got {}) for `{reg}`",
                    length.value
                ),
                length.span,
            ));
        }
        let name = reg.c_name();
        self.out
            .line(format!("semi_buf* {name} = {}({});", names::NEW, length.value + 1));

        let mut stores = Vec::new();
        let payload = if length.ends_section { 0 } else { length.value };
        for index in 0..payload {
            match self.stream.next_raw() {
                None => break,
                Some(c) if c.byte == LITERAL_TERMINATOR => break,
                Some(c) => stores.push(format!("{}({name}, {index}, {});", names::SET, c.byte)),
            }
        }
        if !stores.is_empty() {
            self.out.line(stores.join(" "));
        }
        Ok(())
    }
}
