//! Lexical mode scanner for C-family test sources
//!
//! Classifies every byte of a source file into exactly one [`ScanMode`]
//! without building an AST. The only things it has to get right are the
//! *mode* at each offset (code, string, comment, regex literal) and the
//! parenthesis depth inside code.
//!
//! # Rules
//!
//! - `'`, `"` and `` ` `` open a string of that kind from code; a backslash
//!   escapes the next byte inside any string. Template strings are opaque:
//!   `${...}` interpolation is not tracked.
//! - `//` opens a line comment that ends at the newline (the newline itself
//!   is code). `/*` opens a block comment that ends at `*/`.
//! - A bare `/` in code opens a regex literal only when the previous
//!   significant code byte is a punctuator that must be followed by an
//!   operand (`( , = : [ ! & | ? { } ; \n` and the operator bytes
//!   `> < + - * % ~ ^`), when that byte ends one of the keywords in
//!   [`REGEX_KEYWORDS`], or when there is none. Anything else (identifier,
//!   `)`, `]`, closed literal) makes it a division. This lookback is
//!   approximate by nature; there is no expression grammar here.
//! - Inside a regex literal a backslash escapes the next byte and an unescaped
//!   `/` outside a `[...]` class closes it.
//!
//! # Failure mode
//!
//! Unterminated strings, comments, regex literals and parens run to the end
//! of input. Nothing here errors or panics on malformed text, so one broken
//! file cannot abort a tree-wide run.
//!
//! All delimiters are ASCII, so scanning UTF-8 text byte-wise never confuses a
//! continuation byte for a delimiter.

use serde::{Deserialize, Serialize};

/// Bytes after which a `/` starts a regex literal rather than a division
const REGEX_PRECEDERS: &[u8] = b"(,=:[!&|?{};\n><+-*%~^";

/// Keywords after which a `/` starts a regex literal
const REGEX_KEYWORDS: &[&[u8]] = &[
    b"return", b"typeof", b"case", b"in", b"of", b"void", b"yield", b"await", b"delete",
];

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'$')
}

/// Lexical mode of a byte. Exactly one is active at any offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Code,
    SingleQuoteString,
    DoubleQuoteString,
    TemplateString,
    LineComment,
    BlockComment,
    RegexLiteral,
}

impl ScanMode {
    fn for_quote(quote: u8) -> Option<Self> {
        match quote {
            b'\'' => Some(ScanMode::SingleQuoteString),
            b'"' => Some(ScanMode::DoubleQuoteString),
            b'`' => Some(ScanMode::TemplateString),
            _ => None,
        }
    }

    fn closing_quote(&self) -> Option<u8> {
        match self {
            ScanMode::SingleQuoteString => Some(b'\''),
            ScanMode::DoubleQuoteString => Some(b'"'),
            ScanMode::TemplateString => Some(b'`'),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.closing_quote().is_some()
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, ScanMode::LineComment | ScanMode::BlockComment)
    }
}

/// Bytes `[start, end)` consumed in one scanner step, all in `mode`.
///
/// Code bytes are always single-byte tokens; two-byte tokens are comment
/// openers/closers and escape pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub mode: ScanMode,
}

/// Run-length segment of a single mode. Runs are ordered and never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRun {
    pub start: usize,
    pub end: usize,
    pub mode: ScanMode,
}

/// Single-pass mode state machine over a byte stream
pub struct ModeScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    mode: ScanMode,
    /// Last code byte that was not a space, tab or carriage return
    prev_significant: Option<u8>,
    /// Offset of the last identifier byte recorded in `prev_significant`
    prev_ident_at: usize,
    /// Inside a `[...]` class of a regex literal
    in_class: bool,
}

impl<'a> ModeScanner<'a> {
    /// Scan from the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self::starting_at(source, 0)
    }

    /// Scan from `offset`, which is assumed to be in code mode
    pub fn starting_at(source: &'a str, offset: usize) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: offset,
            mode: ScanMode::Code,
            prev_significant: None,
            prev_ident_at: 0,
            in_class: false,
        }
    }

    /// Mode the next byte will start in
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn regex_allowed(&self) -> bool {
        match self.prev_significant {
            None => true,
            Some(prev) if is_ident_byte(prev) => self.follows_keyword(),
            Some(prev) => REGEX_PRECEDERS.contains(&prev),
        }
    }

    /// The identifier ending at `prev_ident_at` is a keyword, not a
    /// property name like `x.return`
    fn follows_keyword(&self) -> bool {
        let end = self.prev_ident_at + 1;
        let start = self.bytes[..end]
            .iter()
            .rposition(|&b| !is_ident_byte(b))
            .map_or(0, |i| i + 1);
        if start > 0 && self.bytes[start - 1] == b'.' {
            return false;
        }
        REGEX_KEYWORDS.contains(&&self.bytes[start..end])
    }

    fn step_code(&mut self, byte: u8) -> (usize, ScanMode) {
        if let Some(string_mode) = ScanMode::for_quote(byte) {
            self.mode = string_mode;
            return (1, string_mode);
        }

        match byte {
            b'/' => match self.peek(1) {
                Some(b'/') => {
                    self.mode = ScanMode::LineComment;
                    (2, ScanMode::LineComment)
                }
                Some(b'*') => {
                    self.mode = ScanMode::BlockComment;
                    (2, ScanMode::BlockComment)
                }
                _ if self.regex_allowed() => {
                    self.mode = ScanMode::RegexLiteral;
                    self.in_class = false;
                    (1, ScanMode::RegexLiteral)
                }
                _ => {
                    self.prev_significant = Some(b'/');
                    (1, ScanMode::Code)
                }
            },
            b' ' | b'\t' | b'\r' => (1, ScanMode::Code),
            other => {
                self.prev_significant = Some(other);
                self.prev_ident_at = self.pos;
                (1, ScanMode::Code)
            }
        }
    }

    fn step_string(&mut self, mode: ScanMode, byte: u8) -> (usize, ScanMode) {
        if byte == b'\\' {
            return (2, mode);
        }
        if mode.closing_quote() == Some(byte) {
            self.mode = ScanMode::Code;
            // A closed literal is an operand: a following `/` divides.
            self.prev_significant = Some(byte);
        }
        (1, mode)
    }

    fn step_regex(&mut self, byte: u8) -> (usize, ScanMode) {
        match byte {
            b'\\' => (2, ScanMode::RegexLiteral),
            b'[' => {
                self.in_class = true;
                (1, ScanMode::RegexLiteral)
            }
            b']' => {
                self.in_class = false;
                (1, ScanMode::RegexLiteral)
            }
            b'/' if !self.in_class => {
                self.mode = ScanMode::Code;
                self.prev_significant = Some(b'/');
                (1, ScanMode::RegexLiteral)
            }
            _ => (1, ScanMode::RegexLiteral),
        }
    }
}

impl Iterator for ModeScanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start = self.pos;
        let byte = *self.bytes.get(start)?;

        let (width, mode) = match self.mode {
            ScanMode::Code => self.step_code(byte),
            ScanMode::LineComment => {
                if byte == b'\n' {
                    self.mode = ScanMode::Code;
                    self.prev_significant = Some(b'\n');
                    (1, ScanMode::Code)
                } else {
                    (1, ScanMode::LineComment)
                }
            }
            ScanMode::BlockComment => {
                if byte == b'*' && self.peek(1) == Some(b'/') {
                    self.mode = ScanMode::Code;
                    (2, ScanMode::BlockComment)
                } else {
                    (1, ScanMode::BlockComment)
                }
            }
            ScanMode::RegexLiteral => self.step_regex(byte),
            string_mode => self.step_string(string_mode, byte),
        };

        // Escapes at end of input only consume what exists.
        let end = (start + width).min(self.bytes.len());
        self.pos = end;
        Some(Token { start, end, mode })
    }
}

/// Offset one past the `)` matching the first code-mode `(` at or after
/// `open`.
///
/// Parens are counted only in code mode; the scan stops the moment depth
/// returns to zero after at least one increment. Returns `source.len()` when
/// the input ends first.
pub fn find_closing_paren(source: &str, open: usize) -> usize {
    let bytes = source.as_bytes();
    let mut depth = 0usize;

    for token in ModeScanner::starting_at(source, open) {
        if token.mode != ScanMode::Code {
            continue;
        }
        match bytes[token.start] {
            b'(' => depth += 1,
            b')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return token.end;
                }
            }
            _ => {}
        }
    }

    source.len()
}

/// Run-length mode map of a whole file, adjacent equal modes merged
pub fn mode_runs(source: &str) -> Vec<ModeRun> {
    let mut runs: Vec<ModeRun> = Vec::new();

    for token in ModeScanner::new(source) {
        if let Some(last) = runs.last_mut() {
            if last.mode == token.mode && last.end == token.start {
                last.end = token.end;
                continue;
            }
        }
        runs.push(ModeRun {
            start: token.start,
            end: token.end,
            mode: token.mode,
        });
    }

    runs
}

/// Mode of the byte at `offset`, `None` past the end
pub fn mode_at(runs: &[ModeRun], offset: usize) -> Option<ScanMode> {
    let idx = runs.partition_point(|run| run.end <= offset);
    runs.get(idx)
        .filter(|run| run.start <= offset)
        .map(|run| run.mode)
}
