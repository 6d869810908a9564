//! Filling missing entries through a pluggable [`Translator`].
//!
//! A failing translation never aborts a run: the entry keeps its source text
//! and a warning is logged.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{error::Error, token::placeholders, types::ResourceEntry};

/// Marker prepended by [`MarkerTranslator`] unless configured otherwise.
pub const DEFAULT_MARKER: &str = "NEEDS TRANSLATION: ";

/// Translates one text into a target locale.
pub trait Translator: Debug {
    fn translate(&self, text: &str, locale: &str) -> Result<String, Error>;
}

/// Prefixes the source text with a marker for human translators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTranslator {
    marker: String,
}

impl MarkerTranslator {
    pub fn new(marker: impl Into<String>) -> Self {
        MarkerTranslator {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerTranslator {
    fn default() -> Self {
        MarkerTranslator::new(DEFAULT_MARKER)
    }
}

impl Translator for MarkerTranslator {
    fn translate(&self, text: &str, _locale: &str) -> Result<String, Error> {
        Ok(format!("{}{}", self.marker, text))
    }
}

/// Copies the source text unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyTranslator;

impl Translator for CopyTranslator {
    fn translate(&self, text: &str, _locale: &str) -> Result<String, Error> {
        Ok(text.to_string())
    }
}

/// Which translator a configuration selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranslatorKind {
    Marker {
        #[serde(default = "default_marker")]
        marker: String,
    },
    Copy,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl Default for TranslatorKind {
    fn default() -> Self {
        TranslatorKind::Marker {
            marker: default_marker(),
        }
    }
}

impl TranslatorKind {
    pub fn build(&self) -> Box<dyn Translator> {
        match self {
            TranslatorKind::Marker { marker } => Box::new(MarkerTranslator::new(marker.clone())),
            TranslatorKind::Copy => Box::new(CopyTranslator),
        }
    }
}

/// Whether `text` holds at least one argument-consuming placeholder.
pub fn has_placeholders(text: &str) -> bool {
    placeholders(text).iter().any(|p| p.takes_argument())
}

/// Translates `entries` into `locale`.
///
/// Absent texts stay absent. With `skip_placeholder_strings`, texts holding
/// placeholders are copied untranslated. Translation failures fall back to
/// the source text.
pub fn fill_missing(
    entries: Vec<ResourceEntry>,
    translator: &dyn Translator,
    locale: &str,
    skip_placeholder_strings: bool,
) -> Vec<ResourceEntry> {
    entries
        .into_iter()
        .map(|entry| {
            let Some(source) = entry.text.as_deref() else {
                return entry;
            };
            if skip_placeholder_strings && has_placeholders(source) {
                tracing::debug!(key = %entry.key, locale, "copying placeholder string untranslated");
                return entry;
            }
            let text = match translator.translate(source, locale) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(key = %entry.key, locale, error = %e, "translation failed, keeping source text");
                    source.to_string()
                }
            };
            ResourceEntry {
                text: Some(text),
                ..entry
            }
        })
        .collect()
}
