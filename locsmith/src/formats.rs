//! All supported catalog file formats for locsmith.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum, which implements [`CatalogSerializer`] by
//! dispatching to the concrete format.

pub mod android_strings;
pub mod json;

use std::{
    fmt::{Display, Formatter},
    io::{Cursor, ErrorKind},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use json::Format as JsonFormat;

use crate::{
    error::Error,
    traits::{CatalogSerializer, Parser},
    types::Catalog,
};

/// Represents all supported catalog file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Android `strings.xml` format.
    AndroidStrings,
    /// JSON array of `{ "key": ..., "text": ... }` objects.
    Json,
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::AndroidStrings => write!(f, "android"),
            FormatType::Json => write!(f, "json"),
        }
    }
}

/// Accepts `android`, `androidstrings`, `xml` and `json`, case-insensitively.
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" | "androidstrings" | "xml" => Ok(FormatType::AndroidStrings),
            "json" => Ok(FormatType::Json),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the file extension associated with this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::AndroidStrings => "xml",
            FormatType::Json => "json",
        }
    }

    /// Infers the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl CatalogSerializer for FormatType {
    fn parse(&self, bytes: &[u8]) -> Result<Catalog, Error> {
        match self {
            FormatType::AndroidStrings => AndroidStringsFormat::from_bytes(bytes).map(Catalog::from),
            FormatType::Json => JsonFormat::from_bytes(bytes).map(Catalog::from),
        }
    }

    fn serialize(&self, catalog: &Catalog) -> Result<Vec<u8>, Error> {
        let mut out = Cursor::new(Vec::new());
        match self {
            FormatType::AndroidStrings => AndroidStringsFormat::from(catalog).to_writer(&mut out)?,
            FormatType::Json => JsonFormat::from(catalog).to_writer(&mut out)?,
        }
        Ok(out.into_inner())
    }

    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Catalog, Error> {
        match self {
            FormatType::AndroidStrings => AndroidStringsFormat::read_from(path).map(Catalog::from),
            FormatType::Json => JsonFormat::read_from(path).map(Catalog::from),
        }
    }

    /// Android catalogs keep the comments, `<plurals>`, `<string-array>` and
    /// inline markup of `template`. A missing or malformed template yields a
    /// fresh document.
    fn store_onto<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        catalog: &Catalog,
        template: P,
        path: Q,
    ) -> Result<(), Error> {
        match self {
            FormatType::AndroidStrings => {
                let template = template.as_ref();
                let document = match AndroidStringsFormat::read_from(template) {
                    Ok(existing) => existing.with_catalog(catalog),
                    Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                        AndroidStringsFormat::from(catalog)
                    }
                    Err(e) if e.is_parse_error() => {
                        tracing::warn!(path = %template.display(), error = %e, "rebuilding malformed catalog");
                        AndroidStringsFormat::from(catalog)
                    }
                    Err(e) => return Err(e),
                };
                document.write_to(path)
            }
            FormatType::Json => JsonFormat::from(catalog).write_to(path),
        }
    }
}
