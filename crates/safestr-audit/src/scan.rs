//! Source scanning: find call sites of mapped names.
//!
//! A call site is an identifier equal to a mapped name, delimited on both
//! sides by non-identifier bytes and followed (after optional blanks on the
//! same line) by `(`. Comments (`//` and `/* */`), string literals and
//! character literals are blanked out before matching, and member calls
//! (`obj.name(`, `ptr->name(`) are not counted.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AuditError;
use crate::mapping::Mapping;

/// File extensions treated as C/C++ sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hpp", "hh"];

/// One unsafe call in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub name: String,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
}

/// Copy of `text` with every byte that is not code replaced by a blank.
/// Newlines are kept so line numbers survive.
fn code_only(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = Lexeme::Code;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            Lexeme::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    state = Lexeme::LineComment;
                    out[i] = b' ';
                }
                (b'/', Some(b'*')) => {
                    state = Lexeme::BlockComment;
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    i += 1;
                }
                (b'"', _) => state = Lexeme::Str,
                (b'\'', _) => state = Lexeme::Char,
                _ => {}
            },
            Lexeme::LineComment => {
                if b == b'\n' {
                    state = Lexeme::Code;
                } else {
                    out[i] = b' ';
                }
            }
            Lexeme::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = Lexeme::Code;
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    i += 1;
                } else if b != b'\n' {
                    out[i] = b' ';
                }
            }
            Lexeme::Str | Lexeme::Char => {
                let close = if state == Lexeme::Str { b'"' } else { b'\'' };
                if b == close {
                    state = Lexeme::Code;
                } else if b == b'\n' {
                    // Unterminated literal: resume at the next line.
                    state = Lexeme::Code;
                } else {
                    out[i] = b' ';
                    if b == b'\\' && next.is_some_and(|n| n != b'\n') {
                        out[i + 1] = b' ';
                        i += 1;
                    }
                }
            }
        }
        i += 1;
    }
    out
}

/// True if the identifier starting at `start` is reached through `.` or `->`.
fn is_member_access(line: &[u8], start: usize) -> bool {
    let mut k = start;
    while k > 0 && (line[k - 1] == b' ' || line[k - 1] == b'\t') {
        k -= 1;
    }
    match k {
        0 => false,
        1 => line[0] == b'.',
        _ => line[k - 1] == b'.' || (line[k - 2] == b'-' && line[k - 1] == b'>'),
    }
}

/// Call sites in `text`, attributed to `path`, in source order.
#[must_use]
pub fn scan_source(path: &Path, text: &str, mapping: &Mapping) -> Vec<CallSite> {
    let code = code_only(text);
    let mut calls = Vec::new();
    for (idx, line) in code.split(|&b| b == b'\n').enumerate() {
        let mut i = 0;
        while i < line.len() {
            if !is_ident_byte(line[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < line.len() && is_ident_byte(line[i]) {
                i += 1;
            }
            if line[start].is_ascii_digit() || is_member_access(line, start) {
                continue;
            }
            let mut j = i;
            while j < line.len() && (line[j] == b' ' || line[j] == b'\t') {
                j += 1;
            }
            if j == line.len() || line[j] != b'(' {
                continue;
            }
            // Identifier bytes are ASCII, so this slice is valid UTF-8.
            let name = String::from_utf8_lossy(&line[start..i]);
            if mapping.replacement(&name).is_some() {
                calls.push(CallSite {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    name: name.into_owned(),
                });
            }
        }
    }
    calls
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Files to scan under `root`, in sorted order.
///
/// A file given directly is always scanned. Directories contribute their
/// source files, descending into subdirectories only when `recursive`.
pub fn collect_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, AuditError> {
    if !root.exists() {
        return Err(AuditError::MissingPath(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut out = Vec::new();
    walk(root, recursive, &mut out)?;
    Ok(out)
}

fn walk(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<(), AuditError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            if recursive {
                walk(&path, recursive, out)?;
            }
        } else if has_source_extension(&path) {
            out.push(path);
        }
    }
    Ok(())
}
