//! Core, format-agnostic catalog model for locsmith.
//! Serializers decode into these; the diff and merge engines operate on them.

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

/// A single key→text entry of a locale catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceEntry {
    /// Opaque identifier, unique within a catalog.
    pub key: String,

    /// The localized text. `None` models a key declared without a value,
    /// which is preserved through diff and merge.
    #[serde(default)]
    pub text: Option<String>,

    /// Explicit `translatable` flag, when the source format carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translatable: Option<bool>,
}

impl ResourceEntry {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        ResourceEntry {
            key: key.into(),
            text: Some(text.into()),
            translatable: None,
        }
    }

    /// An entry declared without a value.
    pub fn absent(key: impl Into<String>) -> Self {
        ResourceEntry {
            key: key.into(),
            text: None,
            translatable: None,
        }
    }

    pub fn with_translatable(mut self, translatable: Option<bool>) -> Self {
        self.translatable = translatable;
        self
    }

    /// Whether this entry should be sent to translators at all.
    pub fn is_translatable(&self) -> bool {
        self.translatable != Some(false)
    }
}

impl Display for ResourceEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}: {:?}", self.key, text),
            None => write!(f, "{}: <absent>", self.key),
        }
    }
}

/// An ordered key→text mapping for one locale.
///
/// Keys are unique. Insertion order is the declaration order of the source
/// file followed by appended entries. When the same key is offered twice,
/// the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    locale: Option<String>,
    entries: Vec<ResourceEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from entries in order, keeping the first occurrence
    /// of every key.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ResourceEntry>,
    {
        let mut catalog = Catalog::new();
        for entry in entries {
            let key = entry.key.clone();
            if !catalog.push(entry) {
                tracing::warn!(%key, "duplicate key in catalog, keeping first occurrence");
            }
        }
        catalog
    }

    /// Attaches a locale tag. The tag is metadata only.
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Appends `entry` unless its key is already present. Returns whether
    /// the entry was inserted.
    pub fn push(&mut self, entry: ResourceEntry) -> bool {
        if self.index.contains_key(&entry.key) {
            return false;
        }
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Looks up `key`. The outer `Option` is key presence, the inner one
    /// is text presence.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entry(key).map(|e| e.text.as_deref())
    }

    /// The text of `key`, if the key exists and has a value.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    pub fn entry(&self, key: &str) -> Option<&ResourceEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ResourceEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns this catalog extended with every entry whose key is not yet
    /// present, in the order given.
    pub fn with_appended<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = ResourceEntry>,
    {
        for entry in entries {
            self.push(entry);
        }
        self
    }

    /// Rewrites every present text with `f`, keeping keys and order.
    pub fn map_texts<F>(&self, mut f: F) -> Catalog
    where
        F: FnMut(&str) -> String,
    {
        let entries = self.entries.iter().map(|entry| ResourceEntry {
            text: entry.text.as_deref().map(&mut f),
            ..entry.clone()
        });
        Catalog::from_entries(entries).with_locale(self.locale.clone())
    }
}

impl FromIterator<ResourceEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = ResourceEntry>>(iter: T) -> Self {
        Catalog::from_entries(iter)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ResourceEntry;
    type IntoIter = std::slice::Iter<'a, ResourceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
