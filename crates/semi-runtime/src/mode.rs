//! Integer codes for the six canonical stream-open modes.

/// How a String register's path is opened as a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    Read,
    Write,
    Append,
    ReadUpdate,
    WriteUpdate,
    AppendUpdate,
}

impl FileMode {
    /// All modes in code order (1–6).
    pub const ALL: [FileMode; 6] = [
        FileMode::Read,
        FileMode::Write,
        FileMode::Append,
        FileMode::ReadUpdate,
        FileMode::WriteUpdate,
        FileMode::AppendUpdate,
    ];

    /// Map a program-supplied code; anything outside 1–6 opens for writing.
    pub fn from_code(code: i64) -> FileMode {
        match code {
            1 => FileMode::Read,
            3 => FileMode::Append,
            4 => FileMode::ReadUpdate,
            5 => FileMode::WriteUpdate,
            6 => FileMode::AppendUpdate,
            _ => FileMode::Write,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            FileMode::Read => 1,
            FileMode::Write => 2,
            FileMode::Append => 3,
            FileMode::ReadUpdate => 4,
            FileMode::WriteUpdate => 5,
            FileMode::AppendUpdate => 6,
        }
    }

    /// The `fopen` mode string.
    pub fn as_str(self) -> &'static str {
        match self {
            FileMode::Read => "r",
            FileMode::Write => "w",
            FileMode::Append => "a",
            FileMode::ReadUpdate => "r+",
            FileMode::WriteUpdate => "w+",
            FileMode::AppendUpdate => "a+",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for mode in FileMode::ALL {
            assert_eq!(FileMode::from_code(mode.code() as i64), mode);
        }
    }

    #[test]
    fn test_out_of_range_falls_back_to_write() {
        for code in [0, 7, -1, 420, i64::MAX] {
            assert_eq!(FileMode::from_code(code), FileMode::Write);
        }
    }

    #[test]
    fn test_mode_strings() {
        let strs: Vec<_> = FileMode::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(strs, ["r", "w", "a", "r+", "w+", "a+"]);
    }
}
