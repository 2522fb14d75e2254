//! Character stream tests: whitespace and comment skipping, raw reads,
//! push-back ordering and overflow.

use semi_lexer::{CharStream, LexError, SourceChar, PUSHBACK_CAPACITY};
use semi_types::{ErrorCode, SourceFile, Span};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Drain every significant character as a string.
fn significant(source: &str) -> String {
    let sf = SourceFile::new("test.s4", source);
    let mut stream = CharStream::new(&sf);
    let mut out = String::new();
    while let Some(c) = stream.next_significant() {
        out.push(c.display());
    }
    out
}

fn ch(byte: u8) -> SourceChar {
    SourceChar::new(byte, Span::point(1, 1))
}

// ─────────────────────────────────────────────────────────────────────
// Skipping
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(significant(" a \t n\r\n 5 "), "an5");
}

#[test]
fn test_comment_runs_to_end_of_line() {
    assert_eq!(significant("an5 ' declare a\n;ap ' print it"), "an5;ap");
}

#[test]
fn test_comment_marker_inside_comment_is_ignored() {
    assert_eq!(significant("' one ' two\nx"), "x");
}

#[test]
fn test_comment_at_end_of_input() {
    assert_eq!(significant("ap'"), "ap");
}

#[test]
fn test_empty_input() {
    assert_eq!(significant(""), "");
    assert_eq!(significant("   \n\n"), "");
}

#[test]
fn test_raw_read_does_not_skip() {
    let sf = SourceFile::new("test.s4", " 'x\n");
    let mut stream = CharStream::new(&sf);
    let bytes: Vec<u8> = std::iter::from_fn(|| stream.next_raw())
        .map(|c| c.byte)
        .collect();
    assert_eq!(bytes, b" 'x\n");
}

#[test]
fn test_spans_point_at_character() {
    let sf = SourceFile::new("test.s4", "an1\n  ;");
    let mut stream = CharStream::new(&sf);
    for _ in 0..3 {
        stream.next_significant();
    }
    let semi = stream.next_significant().unwrap();
    assert_eq!(semi.byte, b';');
    assert_eq!(semi.span, Span::point(2, 3));
}

// ─────────────────────────────────────────────────────────────────────
// Push-back
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_push_back_replays_before_new_input() {
    let sf = SourceFile::new("test.s4", "xyz");
    let mut stream = CharStream::new(&sf);
    let x = stream.next_significant().unwrap();
    stream.push_back(x).unwrap();
    stream.push_back(ch(b'_')).unwrap();
    assert_eq!(stream.pending(), 2);
    assert_eq!(stream.next_significant().unwrap().byte, b'_');
    assert_eq!(stream.next_significant().unwrap().byte, b'x');
    assert_eq!(stream.next_significant().unwrap().byte, b'y');
}

#[test]
fn test_push_back_is_visible_to_raw_reads() {
    let sf = SourceFile::new("test.s4", "bc");
    let mut stream = CharStream::new(&sf);
    stream.push_back(ch(b'a')).unwrap();
    assert_eq!(stream.next_raw().unwrap().byte, b'a');
    assert_eq!(stream.next_raw().unwrap().byte, b'b');
}

#[test]
fn test_push_back_after_end_of_input() {
    let sf = SourceFile::new("test.s4", "p");
    let mut stream = CharStream::new(&sf);
    let p = stream.next_significant().unwrap();
    assert!(stream.next_significant().is_none());
    stream.push_back(p).unwrap();
    assert_eq!(stream.next_significant(), Some(p));
    assert!(stream.next_significant().is_none());
}

#[test]
fn test_push_back_overflow() {
    let mut stream = CharStream::from_bytes(b"");
    for _ in 0..PUSHBACK_CAPACITY {
        stream.push_back(ch(b'a')).unwrap();
    }
    let err = stream.push_back(ch(b'b')).unwrap_err();
    assert!(matches!(err, LexError::PushbackOverflow { .. }));
    assert_eq!(err.code(), ErrorCode::PUSHBACK_OVERFLOW);
    assert_eq!(err.to_string(), "Un-Buffer overflow (max capacity 8)");
    assert_eq!(stream.pending(), PUSHBACK_CAPACITY);
}
