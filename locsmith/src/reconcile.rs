//! Bringing locale catalogs in line with the reference catalog.
//!
//! A run over a `res/` tree has three phases:
//! 1. every translated locale is diffed against the reference, its missing
//!    entries are translated, normalized and appended;
//! 2. transliterated locales are completed from their source locale's
//!    catalog run through a character map;
//! 3. mirrored locales get a copy of their source locale's strings.

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    charmap::{CharacterMap, CharacterMapLoader, ScriptPair},
    error::Error,
    formats::FormatType,
    normalize::{EscapePolicy, Normalizer},
    operations::{diff, merge_with_report},
    resdir::{ResDir, qualifier_to_langid},
    traits::CatalogSerializer,
    translate::{Translator, fill_missing},
    transliterate::transliterate_catalog,
    types::{Catalog, ResourceEntry},
};

/// Derive `target` from `source` by transliterating with `script`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransliterationRule {
    pub source: String,
    pub target: String,
    pub script: ScriptPair,
}

/// Overwrite `target` with a copy of `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorRule {
    pub source: String,
    pub target: String,
}

/// Options controlling a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileOptions {
    pub escape_policy: EscapePolicy,
    /// Locale qualifiers left untouched.
    pub skip_locales: Vec<String>,
    /// Copy strings with placeholders instead of translating them.
    pub skip_placeholder_strings: bool,
    pub transliterations: Vec<TransliterationRule>,
    pub mirrors: Vec<MirrorRule>,
    /// Also propagate reference entries marked `translatable="false"`.
    pub include_untranslatable: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape_policy(mut self, escape_policy: EscapePolicy) -> Self {
        self.escape_policy = escape_policy;
        self
    }

    pub fn with_skip_locales(mut self, skip_locales: Vec<String>) -> Self {
        self.skip_locales = skip_locales;
        self
    }

    pub fn with_skip_placeholder_strings(mut self, skip: bool) -> Self {
        self.skip_placeholder_strings = skip;
        self
    }

    pub fn with_transliteration(mut self, rule: TransliterationRule) -> Self {
        self.transliterations.push(rule);
        self
    }

    pub fn with_mirror(mut self, rule: MirrorRule) -> Self {
        self.mirrors.push(rule);
        self
    }

    pub fn with_include_untranslatable(mut self, include: bool) -> Self {
        self.include_untranslatable = include;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.escape_policy)
    }

    fn is_skipped(&self, locale: &str) -> bool {
        self.skip_locales.iter().any(|skip| skip == locale)
    }
}

/// How a locale's new entries were produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntrySource {
    Translated,
    Transliterated { from: String, script: String },
    Mirrored { from: String },
}

/// What happened to one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleOutcome {
    pub locale: String,
    pub source: EntrySource,
    /// Keys appended to the catalog.
    pub appended: Vec<String>,
    /// Keys present in the locale but not in its reference.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub obsolete: Vec<String>,
    /// Existing entries whose text was rewritten by normalization.
    pub repaired: usize,
    pub written: bool,
}

impl LocaleOutcome {
    fn new(locale: &str, source: EntrySource) -> Self {
        LocaleOutcome {
            locale: locale.to_string(),
            source,
            appended: Vec::new(),
            obsolete: Vec::new(),
            repaired: 0,
            written: false,
        }
    }
}

/// Report of a whole reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub reference_keys: usize,
    pub locales: Vec<LocaleOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<String>,
}

impl ReconcileReport {
    pub fn total_appended(&self) -> usize {
        self.locales.iter().map(|l| l.appended.len()).sum()
    }

    pub fn total_repaired(&self) -> usize {
        self.locales.iter().map(|l| l.repaired).sum()
    }
}

/// Completes `target` with every translatable reference entry it lacks.
///
/// Missing entries go through `translator` (falling back to the source text
/// on failure), then every text is normalized before the merge. Existing
/// values are never replaced by reference values.
pub fn reconcile_catalog(
    reference: &Catalog,
    target: Catalog,
    translator: &dyn Translator,
    locale: &str,
    options: &ReconcileOptions,
) -> (Catalog, LocaleOutcome) {
    let reference = translatable_view(reference, options.include_untranslatable);
    let report = diff(&reference, &target);
    let filled = fill_missing(
        report.missing,
        translator,
        &translation_locale(locale),
        options.skip_placeholder_strings,
    );
    let mut outcome = LocaleOutcome::new(locale, EntrySource::Translated);
    outcome.obsolete = report.obsolete;
    let catalog = complete(target, filled, &options.normalizer(), &mut outcome);
    (catalog, outcome)
}

/// Completes `target` from `source` transliterated with `map`.
pub fn transliterate_locale(
    source: &Catalog,
    target: Catalog,
    map: &CharacterMap,
    rule: &TransliterationRule,
    options: &ReconcileOptions,
) -> (Catalog, LocaleOutcome) {
    let derived = transliterate_catalog(source, map);
    let report = diff(&derived, &target);
    let mut outcome = LocaleOutcome::new(
        &rule.target,
        EntrySource::Transliterated {
            from: rule.source.clone(),
            script: rule.script.to_string(),
        },
    );
    outcome.obsolete = report.obsolete;
    let catalog = complete(target, report.missing, &options.normalizer(), &mut outcome);
    (catalog, outcome)
}

/// Reconciles every locale of a `res/` tree against `values/strings.xml`.
///
/// An unreadable reference aborts the run with
/// [`Error::ReferenceUnreadable`]. Missing or malformed locale catalogs are
/// treated as empty; any other read or write failure is returned.
pub fn reconcile_dir(
    res: &ResDir,
    translator: &dyn Translator,
    maps: &dyn CharacterMapLoader,
    options: &ReconcileOptions,
) -> Result<ReconcileReport, Error> {
    let format = FormatType::AndroidStrings;
    let reference_path = res.reference_path();
    let reference = format
        .load(&reference_path)
        .map_err(|e| Error::reference_unreadable(&reference_path, e))?;

    let derived: HashSet<&str> = options
        .transliterations
        .iter()
        .map(|rule| rule.target.as_str())
        .chain(options.mirrors.iter().map(|rule| rule.target.as_str()))
        .collect();

    let mut report = ReconcileReport {
        reference_keys: translatable_view(&reference, options.include_untranslatable).len(),
        ..ReconcileReport::default()
    };
    let mut done: HashMap<String, Catalog> = HashMap::new();

    for locale in res.locales()? {
        if derived.contains(locale.as_str()) {
            continue;
        }
        if options.is_skipped(&locale) {
            tracing::debug!(%locale, "skipping locale");
            report.skipped.push(locale);
            continue;
        }
        let path = res.locale_path(&locale);
        let loaded = format.load_or_empty(&path)?;
        let (catalog, mut outcome) =
            reconcile_catalog(&reference, loaded.clone(), translator, &locale, options);
        outcome.written = write_if_changed(format, &loaded, &catalog, &path, options.dry_run)?;
        tracing::info!(%locale, appended = outcome.appended.len(), repaired = outcome.repaired, "reconciled locale");
        report.locales.push(outcome);
        done.insert(locale, catalog);
    }

    for rule in &options.transliterations {
        if options.is_skipped(&rule.target) {
            report.skipped.push(rule.target.clone());
            continue;
        }
        let map = maps.load(&rule.script)?;
        let source = source_catalog(&done, res, format, &rule.source)?;
        let path = res.locale_path(&rule.target);
        let loaded = format.load_or_empty(&path)?;
        let (catalog, mut outcome) =
            transliterate_locale(&source, loaded.clone(), map, rule, options);
        outcome.written = write_if_changed(format, &loaded, &catalog, &path, options.dry_run)?;
        tracing::info!(locale = %rule.target, from = %rule.source, script = %rule.script, appended = outcome.appended.len(), "transliterated locale");
        report.locales.push(outcome);
        done.insert(rule.target.clone(), catalog);
    }

    for rule in &options.mirrors {
        if options.is_skipped(&rule.target) {
            report.skipped.push(rule.target.clone());
            continue;
        }
        let source = source_catalog(&done, res, format, &rule.source)?;
        let path = res.locale_path(&rule.target);
        let loaded = format.load_or_empty(&path)?;
        let mut outcome = LocaleOutcome::new(
            &rule.target,
            EntrySource::Mirrored {
                from: rule.source.clone(),
            },
        );
        outcome.appended = source
            .keys()
            .filter(|key| !loaded.contains_key(key))
            .map(str::to_string)
            .collect();
        outcome.written = write_if_changed(format, &loaded, &source, &path, options.dry_run)?;
        tracing::info!(locale = %rule.target, from = %rule.source, "mirrored locale");
        report.locales.push(outcome);
        done.insert(rule.target.clone(), source);
    }

    Ok(report)
}

fn complete(
    target: Catalog,
    new_entries: Vec<ResourceEntry>,
    normalizer: &Normalizer,
    outcome: &mut LocaleOutcome,
) -> Catalog {
    let normalized = normalizer.normalize_catalog(&target);
    outcome.repaired = target
        .entries()
        .iter()
        .zip(normalized.entries())
        .filter(|(before, after)| before.text != after.text)
        .count();

    let new_entries = new_entries.into_iter().map(|entry| ResourceEntry {
        text: entry.text.as_deref().map(|text| normalizer.normalize(text)),
        ..entry
    });
    let (merged, merge_report) = merge_with_report(normalized, new_entries);
    outcome.appended = merge_report.appended;
    merged
}

fn translatable_view(reference: &Catalog, include_untranslatable: bool) -> Cow<'_, Catalog> {
    if include_untranslatable || reference.entries().iter().all(ResourceEntry::is_translatable) {
        return Cow::Borrowed(reference);
    }
    Cow::Owned(
        reference
            .entries()
            .iter()
            .filter(|entry| entry.is_translatable())
            .cloned()
            .collect(),
    )
}

/// BCP 47 tag handed to translators; falls back to the raw qualifier.
fn translation_locale(qualifier: &str) -> String {
    qualifier_to_langid(qualifier)
        .map(|langid| langid.to_string())
        .unwrap_or_else(|_| qualifier.to_string())
}

/// The catalog of `locale` as produced earlier in this run, or as on disk.
fn source_catalog(
    done: &HashMap<String, Catalog>,
    res: &ResDir,
    format: FormatType,
    locale: &str,
) -> Result<Catalog, Error> {
    match done.get(locale) {
        Some(catalog) => Ok(catalog.clone()),
        None => format.load_or_empty(res.locale_path(locale)),
    }
}

/// Writes `catalog` when its entries differ from what was loaded, or when
/// the file does not exist yet. Entry order is not compared: an existing
/// Android file keeps its own order when rewritten.
fn write_if_changed(
    format: FormatType,
    loaded: &Catalog,
    catalog: &Catalog,
    path: &Path,
    dry_run: bool,
) -> Result<bool, Error> {
    let changed = loaded.len() != catalog.len()
        || catalog
            .entries()
            .iter()
            .any(|entry| loaded.entry(&entry.key) != Some(entry))
        || !path.is_file();
    if !changed || dry_run {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    format.store(catalog, path)?;
    Ok(true)
}
