//! Escape normalization and positional placeholder renumbering.
//!
//! [`Normalizer::normalize`] is idempotent. It first canonicalizes escaping
//! (unescape every known form of a delimiter, then escape once with the
//! configured [`EscapePolicy`]) and then renumbers non-positional
//! placeholders when a string has more than one of them.
//!
//! ```rust
//! use locsmith::{EscapePolicy, Normalizer};
//!
//! let normalizer = Normalizer::new(EscapePolicy::Backslash);
//! assert_eq!(normalizer.normalize("%s bought %d items"), "%1$s bought %2$d items");
//! assert_eq!(normalizer.normalize(r"Don\\'t"), r"Don\'t");
//! ```

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    token::{Token, Tokens, placeholders},
    types::Catalog,
};

lazy_static! {
    // `&amp;#39;`, `&amp;amp;quot;`, ... left behind by repeated entity escaping.
    static ref STACKED_ENTITY_REGEX: Regex =
        Regex::new(r"&(?:amp;)+(#0*39;|#[xX]0*27;|apos;|quot;|#0*34;|#[xX]0*22;)").unwrap();
}

/// Characters that must be escaped in catalog text.
pub const DELIMITERS: [char; 2] = ['\'', '"'];

/// The single escaping transform applied to delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapePolicy {
    /// `\'` and `\"`, as Android resource strings expect.
    #[default]
    Backslash,
    /// `&#39;` and `&quot;`, for serializers that emit text verbatim.
    Entity,
}

impl EscapePolicy {
    fn escape(self, delimiter: char) -> &'static str {
        match (self, delimiter) {
            (EscapePolicy::Backslash, '\'') => r"\'",
            (EscapePolicy::Backslash, _) => r#"\""#,
            (EscapePolicy::Entity, '\'') => "&#39;",
            (EscapePolicy::Entity, _) => "&quot;",
        }
    }
}

impl Display for EscapePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EscapePolicy::Backslash => write!(f, "backslash"),
            EscapePolicy::Entity => write!(f, "entity"),
        }
    }
}

impl FromStr for EscapePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backslash" => Ok(EscapePolicy::Backslash),
            "entity" | "xml" => Ok(EscapePolicy::Entity),
            _ => Err(Error::config_error(format!(
                "unknown escape policy `{}` (expected backslash or entity)",
                s
            ))),
        }
    }
}

/// Idempotent text normalizer bound to one escaping policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    policy: EscapePolicy,
}

enum Unit<'a> {
    Delimiter(char),
    EscapedBackslash,
    Verbatim(Token<'a>),
}

impl Normalizer {
    pub fn new(policy: EscapePolicy) -> Self {
        Normalizer { policy }
    }

    pub fn policy(&self) -> EscapePolicy {
        self.policy
    }

    /// Canonicalizes escaping, then renumbers ambiguous placeholders.
    pub fn normalize(&self, text: &str) -> String {
        renumber_placeholders(&self.canonicalize_escaping(text))
    }

    /// Normalizes every present text of `catalog`.
    pub fn normalize_catalog(&self, catalog: &Catalog) -> Catalog {
        catalog.map_texts(|text| self.normalize(text))
    }

    /// Decodes every escaped or entity form of a delimiter and re-escapes it
    /// once with this normalizer's policy. Escaped backslashes directly in
    /// front of a delimiter are treated as stacked escaping and dropped.
    pub fn canonicalize_escaping(&self, text: &str) -> String {
        let collapsed = STACKED_ENTITY_REGEX.replace_all(text, "&$1");
        let units: Vec<Unit<'_>> = Tokens::new(&collapsed).map(classify).collect();

        let mut drop_layer = vec![false; units.len()];
        let mut before_delimiter = false;
        for (i, unit) in units.iter().enumerate().rev() {
            match unit {
                Unit::Delimiter(_) => before_delimiter = true,
                Unit::EscapedBackslash => drop_layer[i] = before_delimiter,
                Unit::Verbatim(_) => before_delimiter = false,
            }
        }

        let mut out = String::with_capacity(collapsed.len() + 8);
        for (unit, drop) in units.iter().zip(drop_layer) {
            match unit {
                Unit::Delimiter(c) => out.push_str(self.policy.escape(*c)),
                Unit::EscapedBackslash if drop => {}
                Unit::EscapedBackslash => out.push_str(r"\\"),
                Unit::Verbatim(token) => token.push_raw(&mut out),
            }
        }
        out
    }
}

fn classify(token: Token<'_>) -> Unit<'_> {
    match token {
        Token::Literal(c) if DELIMITERS.contains(&c) => Unit::Delimiter(c),
        // Only a trailing backslash is tokenized as a literal.
        Token::Literal('\\') => Unit::EscapedBackslash,
        Token::Escape(r"\\") => Unit::EscapedBackslash,
        Token::Escape(raw) => match decode_delimiter(raw) {
            Some(c) => Unit::Delimiter(c),
            None => Unit::Verbatim(token),
        },
        other => Unit::Verbatim(other),
    }
}

fn decode_delimiter(raw: &str) -> Option<char> {
    if raw == r"\'" || raw == "&apos;" {
        return Some('\'');
    }
    if raw == r#"\""# || raw == "&quot;" {
        return Some('"');
    }
    let numeric = raw.strip_prefix("&#")?.strip_suffix(';')?;
    let code = match numeric.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => numeric.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|c| DELIMITERS.contains(c))
}

/// Rewrites non-positional placeholders into positional form, numbered
/// from 1 in order of appearance, when there is more than one of them.
/// Positional placeholders are untouched and do not advance the counter.
pub fn renumber_placeholders(text: &str) -> String {
    let ambiguous = placeholders(text)
        .iter()
        .filter(|p| is_ambiguous(p))
        .count();
    if ambiguous < 2 {
        return text.to_string();
    }

    let initial = (String::with_capacity(text.len() + ambiguous * 2), 1usize);
    let (out, _) = Tokens::new(text).fold(initial, |(mut out, next), token| match token {
        Token::Placeholder(p) if is_ambiguous(&p) => {
            out.push_str(&p.with_position(next));
            (out, next + 1)
        }
        other => {
            other.push_raw(&mut out);
            (out, next)
        }
    });
    out
}

fn is_ambiguous(placeholder: &crate::token::Placeholder<'_>) -> bool {
    !placeholder.is_positional() && placeholder.takes_argument()
}
