#![forbid(unsafe_code)]
//! Token-aware text transducer and catalog reconciliation for localization
//! resources.
//!
//! Localized strings carry format placeholders (`%1$s`, `%.2f`) and escape
//! sequences (`\'`, `&#39;`) that must survive every transformation byte for
//! byte. `locsmith` tokenizes text once and runs script transliteration and
//! escape normalization over the tokens, then keeps locale catalogs in line
//! with a reference catalog without ever overwriting existing translations.
//!
//! # Quick Start
//!
//! ```rust
//! use locsmith::{Catalog, EscapePolicy, Normalizer, ResourceEntry, operations};
//!
//! let reference = Catalog::from_entries(vec![
//!     ResourceEntry::new("greeting", "Hello %s, it's %s"),
//!     ResourceEntry::new("farewell", "Bye"),
//! ]);
//! let target = Catalog::from_entries(vec![ResourceEntry::new("farewell", "Kenavo")]);
//!
//! let normalizer = Normalizer::new(EscapePolicy::Backslash);
//! let missing: Vec<_> = operations::missing(&reference, &target)
//!     .into_iter()
//!     .map(|entry| ResourceEntry {
//!         text: entry.text.as_deref().map(|t| normalizer.normalize(t)),
//!         ..entry
//!     })
//!     .collect();
//! let merged = operations::merge(target, missing);
//!
//! assert_eq!(merged.text("farewell"), Some("Kenavo"));
//! assert_eq!(merged.text("greeting"), Some(r"Hello %1$s, it\'s %2$s"));
//! ```
//!
//! # Modules
//!
//! - [`token`]: placeholder- and escape-aware tokenizer
//! - [`transliterate`] and [`charmap`]: script transliteration
//! - [`normalize`]: idempotent escape normalization and placeholder renumbering
//! - [`types`] and [`operations`]: catalog model, diff, merge, audit, verify
//! - [`formats`]: Android `strings.xml` and JSON serializers
//! - [`translate`], [`resdir`] and [`reconcile`]: whole `res/` tree runs

pub mod charmap;
pub mod error;
pub mod formats;
pub mod normalize;
pub mod operations;
pub mod reconcile;
pub mod resdir;
pub mod token;
pub mod traits;
pub mod translate;
pub mod transliterate;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    charmap::{CharacterMap, CharacterMapLoader, CharacterMapRegistry, ScriptPair},
    error::Error,
    formats::FormatType,
    normalize::{EscapePolicy, Normalizer},
    operations::{DiffReport, MergeReport, diff, merge, merge_with_report, missing},
    reconcile::{ReconcileOptions, ReconcileReport, reconcile_catalog, reconcile_dir},
    resdir::ResDir,
    token::{Placeholder, Token, Tokens, tokenize},
    traits::CatalogSerializer,
    translate::{CopyTranslator, MarkerTranslator, Translator},
    transliterate::{transliterate, transliterate_catalog},
    types::{Catalog, ResourceEntry},
};
