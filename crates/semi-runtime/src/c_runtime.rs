//! C implementation of the runtime, embedded into generated programs.

use std::fmt::Write;

use crate::{FileMode, GROW_FACTOR, MIN_CAPACITY};

const BUFFER_SOURCE: &str = include_str!("semi_buf.h");

/// Names of the C functions generated programs may call.
pub mod names {
    pub const NEW: &str = "semi_buf_new";
    pub const FROM: &str = "semi_buf_from";
    pub const FREE: &str = "semi_buf_free";
    pub const SET: &str = "semi_buf_set";
    pub const GET: &str = "semi_buf_get";
    pub const RESIZE: &str = "semi_buf_resize";
    pub const APPEND_CHAR: &str = "semi_buf_append_char";
    pub const APPEND: &str = "semi_buf_append";
    pub const COPY_TO: &str = "semi_buf_copy_to";
    pub const CSTR: &str = "semi_buf_cstr";
    pub const WRITE: &str = "semi_buf_write";
    pub const PRINT: &str = "semi_buf_print";
    pub const FILE_MODE: &str = "semi_file_mode";
}

/// Render the complete C runtime.
pub fn render() -> String {
    let mut out = String::with_capacity(BUFFER_SOURCE.len() + 512);
    let _ = writeln!(out, "#define SEMI_MIN_CAPACITY ({MIN_CAPACITY})");
    let _ = writeln!(out, "#define SEMI_GROW_FACTOR ({GROW_FACTOR})");
    out.push_str(BUFFER_SOURCE);
    out.push('\n');
    render_file_mode(&mut out);
    out
}

fn render_file_mode(out: &mut String) {
    let _ = writeln!(out, "static const char* {}(int no) {{", names::FILE_MODE);
    out.push_str("    switch(no) {\n");
    for mode in FileMode::ALL {
        if mode == FileMode::Write {
            continue;
        }
        let _ = writeln!(out, "        case {}: return \"{}\";", mode.code(), mode.as_str());
    }
    let _ = writeln!(out, "        default: return \"{}\";", FileMode::Write.as_str());
    out.push_str("    }\n}\n");
}
