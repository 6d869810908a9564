//! Lossless tokenizer for resource strings.
//!
//! Every downstream transformation (transliteration, escape normalization,
//! placeholder renumbering) works on this token stream so that escape
//! sequences and format placeholders are never touched by accident.
//!
//! Concatenating the raw text of all tokens always reproduces the input:
//!
//! ```rust
//! use locsmith::token::{Token, tokenize, concat};
//!
//! let tokens = tokenize(r"Don\'t lose %1$d items");
//! assert!(matches!(tokens[3], Token::Escape(r"\'")));
//! assert_eq!(concat(&tokens), r"Don\'t lose %1$d items");
//! ```

use std::fmt::{self, Display, Formatter};

/// Character introducing a format placeholder.
pub const PLACEHOLDER_INTRODUCER: char = '%';

/// Character introducing a two-character escape sequence.
pub const ESCAPE_MARKER: char = '\\';

/// Character introducing a character entity reference.
pub const ENTITY_INTRODUCER: char = '&';

const PLACEHOLDER_FLAGS: &[u8] = b"-#+0,(";
const CONVERSIONS: &[u8] = b"sSdiubBhHcCoxXeEfgGaA@n%";
const INTEGER_CONVERSIONS: &[u8] = b"diuoxX";

/// A single lexical unit of a resource string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// One transformable character.
    Literal(char),
    /// An opaque escape: `\` plus the following character, or a complete
    /// entity reference such as `&#39;`.
    Escape(&'a str),
    /// An opaque format specifier such as `%s`, `%1$d` or `%.2f`.
    Placeholder(Placeholder<'a>),
}

impl<'a> Token<'a> {
    /// Appends the exact source text of this token to `out`.
    pub fn push_raw(&self, out: &mut String) {
        match self {
            Token::Literal(c) => out.push(*c),
            Token::Escape(raw) => out.push_str(raw),
            Token::Placeholder(p) => out.push_str(p.raw),
        }
    }

    /// Length in bytes of the source text of this token.
    pub fn raw_len(&self) -> usize {
        match self {
            Token::Literal(c) => c.len_utf8(),
            Token::Escape(raw) => raw.len(),
            Token::Placeholder(p) => p.raw.len(),
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "{}", c),
            Token::Escape(raw) => f.write_str(raw),
            Token::Placeholder(p) => f.write_str(p.raw),
        }
    }
}

/// A format specifier recognized by the tokenizer.
///
/// Malformed specifiers (a `%` not followed by a conversion character) are
/// still placeholders, just without a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    raw: &'a str,
    position: Option<usize>,
    conversion: Option<char>,
}

impl<'a> Placeholder<'a> {
    /// The exact source text.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Explicit argument index (`2` for `%2$s`), if present.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Conversion character (`s` for `%1$s`), if one was found.
    pub fn conversion(&self) -> Option<char> {
        self.conversion
    }

    pub fn is_positional(&self) -> bool {
        self.position.is_some()
    }

    /// Whether the runtime formatter consumes an argument for this specifier.
    /// `%%`, `%n` and malformed fragments do not.
    pub fn takes_argument(&self) -> bool {
        matches!(self.conversion, Some(c) if c != '%' && c != 'n')
    }

    /// Returns the specifier rewritten with an explicit argument index,
    /// e.g. `%.2f` with `3` becomes `%3$.2f`. Positional specifiers are
    /// returned unchanged.
    pub fn with_position(&self, position: usize) -> String {
        if self.is_positional() {
            return self.raw.to_string();
        }
        let rest = &self.raw[PLACEHOLDER_INTRODUCER.len_utf8()..];
        format!("{}{}${}", PLACEHOLDER_INTRODUCER, position, rest)
    }
}

/// Restartable scanner over a resource string. Each call to [`Tokens::new`]
/// starts a fresh scan; no state is shared between scans.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokens { input, pos: 0 }
    }

    fn scan_placeholder(&self, start: usize) -> Placeholder<'a> {
        let bytes = self.input.as_bytes();
        let len = bytes.len();
        let mut j = start + 1;

        // Optional positional index: digits followed by '$'
        let mut position = None;
        let digits_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start && j < len && bytes[j] == b'$' {
            position = self.input[digits_start..j].parse::<usize>().ok();
            j += 1;
        } else {
            j = digits_start;
        }

        while j < len && PLACEHOLDER_FLAGS.contains(&bytes[j]) {
            j += 1;
        }
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j + 1 < len && bytes[j] == b'.' && bytes[j + 1].is_ascii_digit() {
            j += 1;
            while j < len && bytes[j].is_ascii_digit() {
                j += 1;
            }
        }

        // Optional length modifiers: l, ll, or h before an integer conversion
        if j < len && bytes[j] == b'l' {
            j += 1;
            if j < len && bytes[j] == b'l' {
                j += 1;
            }
        } else if j + 1 < len && bytes[j] == b'h' && INTEGER_CONVERSIONS.contains(&bytes[j + 1]) {
            j += 1;
        }

        let mut conversion = None;
        if j < len && CONVERSIONS.contains(&bytes[j]) {
            conversion = Some(bytes[j] as char);
            j += 1;
        }

        Placeholder {
            raw: &self.input[start..j],
            position,
            conversion,
        }
    }

    /// Returns the end of an entity reference starting at `start`, if any.
    fn scan_entity(&self, start: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let len = bytes.len();
        let mut j = start + 1;

        if j < len && bytes[j] == b'#' {
            j += 1;
            let hex = j < len && (bytes[j] == b'x' || bytes[j] == b'X');
            if hex {
                j += 1;
            }
            let body_start = j;
            while j < len
                && (if hex {
                    bytes[j].is_ascii_hexdigit()
                } else {
                    bytes[j].is_ascii_digit()
                })
            {
                j += 1;
            }
            if j == body_start {
                return None;
            }
        } else {
            if j >= len || !bytes[j].is_ascii_alphabetic() {
                return None;
            }
            while j < len && bytes[j].is_ascii_alphanumeric() {
                j += 1;
            }
        }

        (j < len && bytes[j] == b';').then_some(j + 1)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let mut chars = self.input[start..].chars();
        let current = chars.next()?;

        let token = match current {
            PLACEHOLDER_INTRODUCER => Token::Placeholder(self.scan_placeholder(start)),
            ESCAPE_MARKER => match chars.next() {
                Some(next) => {
                    let end = start + current.len_utf8() + next.len_utf8();
                    Token::Escape(&self.input[start..end])
                }
                None => Token::Literal(current),
            },
            ENTITY_INTRODUCER => match self.scan_entity(start) {
                Some(end) => Token::Escape(&self.input[start..end]),
                None => Token::Literal(current),
            },
            c => Token::Literal(c),
        };

        self.pos += token.raw_len();
        Some(token)
    }
}

/// Splits `text` into tokens covering every character exactly once.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    Tokens::new(text).collect()
}

/// Concatenates the raw text of `tokens`.
pub fn concat(tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(Token::raw_len).sum());
    for token in tokens {
        token.push_raw(&mut out);
    }
    out
}

/// All placeholders of `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<Placeholder<'_>> {
    Tokens::new(text)
        .filter_map(|token| match token {
            Token::Placeholder(p) => Some(p),
            _ => None,
        })
        .collect()
}
