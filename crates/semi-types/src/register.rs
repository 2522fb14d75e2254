//! The 64-slot register alphabet and its type-state table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RegisterError;

/// Number of addressable registers.
pub const REGISTER_COUNT: usize = 26 + 26 + 10 + 2;

const STRING_ACCUMULATOR: u8 = b'$';
const NUMBER_ACCUMULATOR: u8 = b'_';

/// Type-state of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterKind {
    String,
    Number,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "numeric"),
        }
    }
}

/// One of the 64 single-character registers.
///
/// The dense index orders lowercase letters, uppercase letters, digits,
/// then the two accumulators `$` and `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    /// The String accumulator `$`.
    pub const STRING_ACC: Register = Register(62);
    /// The Number accumulator `_`.
    pub const NUMBER_ACC: Register = Register(63);

    /// Map a source character to its register.
    pub fn from_char(c: u8) -> Option<Register> {
        let index = match c {
            b'a'..=b'z' => c - b'a',
            b'A'..=b'Z' => c - b'A' + 26,
            b'0'..=b'9' => c - b'0' + 52,
            STRING_ACCUMULATOR => 62,
            NUMBER_ACCUMULATOR => 63,
            _ => return None,
        };
        Some(Register(index))
    }

    /// Like [`Register::from_char`], failing with "expected register name".
    pub fn parse(c: u8) -> Result<Register, RegisterError> {
        Self::from_char(c).ok_or(RegisterError::InvalidName(c as char))
    }

    /// Register at a dense index, if in range.
    pub fn from_index(index: usize) -> Option<Register> {
        (index < REGISTER_COUNT).then_some(Register(index as u8))
    }

    /// Dense index in `0..REGISTER_COUNT`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The source character naming this register.
    pub fn to_char(self) -> char {
        let c = match self.0 {
            0..=25 => b'a' + self.0,
            26..=51 => b'A' + (self.0 - 26),
            52..=61 => b'0' + (self.0 - 52),
            62 => STRING_ACCUMULATOR,
            _ => NUMBER_ACCUMULATOR,
        };
        c as char
    }

    /// The accumulator substituted when an output operand of `kind` is omitted.
    pub fn accumulator(kind: RegisterKind) -> Register {
        match kind {
            RegisterKind::String => Self::STRING_ACC,
            RegisterKind::Number => Self::NUMBER_ACC,
        }
    }

    pub fn is_alphabetic(self) -> bool {
        self.0 < 52
    }

    pub fn is_digit(self) -> bool {
        (52..62).contains(&self.0)
    }

    /// The C expression naming this register in generated code.
    ///
    /// Letters keep their name and digits are integer literals; the
    /// accumulators get identifiers that are valid without extensions.
    pub fn c_name(self) -> &'static str {
        const NAMES: [&str; REGISTER_COUNT] = [
            "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p",
            "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "A", "B", "C", "D", "E", "F",
            "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V",
            "W", "X", "Y", "Z", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "str_acc",
            "num_acc",
        ];
        NAMES[self.index()]
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Type-state of all 64 registers for one compilation.
///
/// Slots hold `None` while a register is still undefined.
#[derive(Debug, Clone)]
pub struct RegisterTable {
    kinds: [Option<RegisterKind>; REGISTER_COUNT],
}

impl RegisterTable {
    /// A table seeded with the fixed defaults: digits and `_` are
    /// numeric, `$` is a string, everything else is undefined.
    pub fn new() -> Self {
        let mut kinds = [None; REGISTER_COUNT];
        for slot in kinds.iter_mut().skip(52).take(10) {
            *slot = Some(RegisterKind::Number);
        }
        kinds[Register::NUMBER_ACC.index()] = Some(RegisterKind::Number);
        kinds[Register::STRING_ACC.index()] = Some(RegisterKind::String);
        Self { kinds }
    }

    /// Current type-state, or `None` if undefined.
    pub fn get(&self, reg: Register) -> Option<RegisterKind> {
        self.kinds[reg.index()]
    }

    /// Established type of `reg`; fails as "undeclared register".
    pub fn kind_of(&self, reg: Register) -> Result<RegisterKind, RegisterError> {
        self.get(reg).ok_or(RegisterError::Undeclared(reg.to_char()))
    }

    /// Establish the type of a register.
    ///
    /// A register's type can be set once; a second declaration fails.
    pub fn declare(&mut self, reg: Register, kind: RegisterKind) -> Result<(), RegisterError> {
        let slot = &mut self.kinds[reg.index()];
        if let Some(existing) = *slot {
            return Err(RegisterError::Redeclared {
                register: reg.to_char(),
                existing,
            });
        }
        *slot = Some(kind);
        Ok(())
    }

    /// Read `reg` and require it to hold `expected`.
    pub fn expect(&self, reg: Register, expected: RegisterKind) -> Result<(), RegisterError> {
        let actual = self.kind_of(reg)?;
        if actual != expected {
            return Err(RegisterError::TypeMismatch {
                register: reg.to_char(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// All registers whose final type is String, in index order.
    pub fn strings(&self) -> impl Iterator<Item = Register> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == Some(RegisterKind::String))
            .filter_map(|(i, _)| Register::from_index(i))
    }
}

impl Default for RegisterTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_covers_alphabet() {
        let alphabet = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$_";
        assert_eq!(alphabet.len(), REGISTER_COUNT);
        for (i, &c) in alphabet.iter().enumerate() {
            let reg = Register::from_char(c).unwrap();
            assert_eq!(reg.index(), i, "index of `{}`", c as char);
            assert_eq!(reg.to_char(), c as char);
        }
    }

    #[test]
    fn test_invalid_register_name() {
        for c in [b' ', b';', b'.', b'?', b'#', b'@', 0xff] {
            assert!(Register::from_char(c).is_none());
        }
        let err = Register::parse(b'?').unwrap_err();
        assert_eq!(err, RegisterError::InvalidName('?'));
    }

    #[test]
    fn test_defaults() {
        let table = RegisterTable::new();
        for c in b'0'..=b'9' {
            let reg = Register::from_char(c).unwrap();
            assert_eq!(table.get(reg), Some(RegisterKind::Number));
        }
        assert_eq!(table.get(Register::NUMBER_ACC), Some(RegisterKind::Number));
        assert_eq!(table.get(Register::STRING_ACC), Some(RegisterKind::String));
        let a = Register::from_char(b'a').unwrap();
        assert_eq!(table.get(a), None);
        assert_eq!(table.kind_of(a), Err(RegisterError::Undeclared('a')));
    }

    #[test]
    fn test_declare_once() {
        let mut table = RegisterTable::new();
        let a = Register::from_char(b'a').unwrap();
        table.declare(a, RegisterKind::String).unwrap();
        assert_eq!(table.kind_of(a), Ok(RegisterKind::String));
        let err = table.declare(a, RegisterKind::Number).unwrap_err();
        assert!(matches!(err, RegisterError::Redeclared { register: 'a', .. }));
    }

    #[test]
    fn test_expect_type_mismatch() {
        let mut table = RegisterTable::new();
        let n = Register::from_char(b'n').unwrap();
        table.declare(n, RegisterKind::Number).unwrap();
        assert_eq!(
            table.expect(n, RegisterKind::String),
            Err(RegisterError::TypeMismatch {
                register: 'n',
                expected: RegisterKind::String,
                actual: RegisterKind::Number,
            })
        );
        assert!(table.expect(n, RegisterKind::Number).is_ok());
    }

    #[test]
    fn test_strings_lists_string_registers_in_order() {
        let mut table = RegisterTable::new();
        for c in [b'z', b'b'] {
            let reg = Register::from_char(c).unwrap();
            table.declare(reg, RegisterKind::String).unwrap();
        }
        let names: String = table.strings().map(|r| r.to_char()).collect();
        assert_eq!(names, "bz$");
    }

    #[test]
    fn test_c_names() {
        assert_eq!(Register::from_char(b'q').unwrap().c_name(), "q");
        assert_eq!(Register::from_char(b'Q').unwrap().c_name(), "Q");
        assert_eq!(Register::from_char(b'7').unwrap().c_name(), "7");
        assert_eq!(Register::STRING_ACC.c_name(), "str_acc");
        assert_eq!(Register::NUMBER_ACC.c_name(), "num_acc");
    }
}
