//! All error types for the locsmith crate.
//!
//! Tokenizing, transliterating, normalizing, diffing and merging never fail.
//! Errors only come from the edges: catalog (de)serialization, character map
//! loading, translation collaborators and configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("reference catalog `{}` is unreadable: {source}", path.display())]
    ReferenceUnreadable {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("translation to `{locale}` failed: {message}")]
    Translation { locale: String, message: String },

    #[error("invalid character map: {0}")]
    InvalidCharacterMap(String),

    #[error("unknown script pair `{0}`")]
    UnknownScriptPair(String),

    #[error("invalid locale `{0}`")]
    InvalidLocale(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new translation error for the given target locale.
    pub fn translation_error(locale: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Translation {
            locale: locale.into(),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Wraps a load failure of the reference catalog, which is the one
    /// unrecoverable condition of a reconciliation run.
    pub fn reference_unreadable(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::ReferenceUnreadable {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error stems from malformed catalog input. Read failures
    /// surfacing through the XML or JSON readers are I/O errors, not parse
    /// errors.
    pub fn is_parse_error(&self) -> bool {
        match self {
            Error::XmlParse(quick_xml::Error::Io(_)) => false,
            Error::Json(e) => !e.is_io(),
            Error::XmlParse(_) | Error::InvalidResource(_) => true,
            _ => false,
        }
    }
}
