//! The command alphabet: the character following a statement's register.

/// Binary operators. All take a second Number operand, except String `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
}

impl BinaryOp {
    /// The C operator implementing this op.
    pub fn c_operator(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Eq => "==",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    BitNot,
    Not,
    Neg,
}

impl UnaryOp {
    pub fn c_operator(self) -> &'static str {
        match self {
            Self::BitNot => "~",
            Self::Not => "!",
            Self::Neg => "-",
        }
    }
}

/// A statement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Assign,
    CharAt,
    CharSet,
    ArgLoad,
    Put,
    Debug,
    Exit,
    InputStream,
    OutputStream,
    GetChar,
    Input,
    Resize,
    Size,
    Print,
    If,
}

impl Command {
    pub fn from_byte(c: u8) -> Option<Command> {
        let cmd = match c {
            b'+' => Command::Binary(BinaryOp::Add),
            b'-' => Command::Binary(BinaryOp::Sub),
            b'*' => Command::Binary(BinaryOp::Mul),
            b'/' => Command::Binary(BinaryOp::Div),
            b'%' => Command::Binary(BinaryOp::Rem),
            b'<' => Command::Binary(BinaryOp::Lt),
            b'>' => Command::Binary(BinaryOp::Gt),
            b'&' => Command::Binary(BinaryOp::BitAnd),
            b'|' => Command::Binary(BinaryOp::BitOr),
            b'^' => Command::Binary(BinaryOp::BitXor),
            b'=' => Command::Binary(BinaryOp::Eq),
            b'~' => Command::Unary(UnaryOp::BitNot),
            b'!' => Command::Unary(UnaryOp::Not),
            b'_' => Command::Unary(UnaryOp::Neg),
            b'$' => Command::Assign,
            b'@' => Command::CharAt,
            b'#' => Command::CharSet,
            b'a' => Command::ArgLoad,
            b'c' => Command::Put,
            b'd' => Command::Debug,
            b'e' => Command::Exit,
            b'f' => Command::InputStream,
            b'F' => Command::OutputStream,
            b'g' => Command::GetChar,
            b'i' => Command::Input,
            b'r' => Command::Resize,
            b's' => Command::Size,
            b'p' => Command::Print,
            b'?' => Command::If,
            _ => return None,
        };
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_operators() {
        let ops: String = "+-*/%<>&|^=".to_string();
        for c in ops.bytes() {
            assert!(
                matches!(Command::from_byte(c), Some(Command::Binary(_))),
                "`{}`",
                c as char
            );
        }
        assert_eq!(BinaryOp::Eq.c_operator(), "==");
    }

    #[test]
    fn test_unary_underscore_is_negation() {
        assert_eq!(Command::from_byte(b'_'), Some(Command::Unary(UnaryOp::Neg)));
        assert_eq!(UnaryOp::Neg.c_operator(), "-");
    }

    #[test]
    fn test_unknown_commands() {
        for c in [b'x', b'Z', b';', b'.', b':', b' ', b'0'] {
            assert_eq!(Command::from_byte(c), None, "`{}`", c as char);
        }
    }
}
