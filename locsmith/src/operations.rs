//! High-level catalog operations (diff/merge/audit/verify) reusable by CLI
//! and library users.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    normalize::Normalizer,
    types::{Catalog, ResourceEntry},
};

/// Reference entries whose key does not exist in `target`, in reference
/// order. A key present in both is never missing, whatever its text.
pub fn missing(reference: &Catalog, target: &Catalog) -> Vec<ResourceEntry> {
    reference
        .entries()
        .iter()
        .filter(|entry| !target.contains_key(&entry.key))
        .cloned()
        .collect()
}

/// Key-level comparison of a target catalog against its reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffReport {
    /// Reference entries absent from the target, in reference order.
    pub missing: Vec<ResourceEntry>,
    /// Target keys absent from the reference, in target order.
    pub obsolete: Vec<String>,
    /// Number of reference keys also present in the target.
    pub present: usize,
}

impl DiffReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn diff(reference: &Catalog, target: &Catalog) -> DiffReport {
    let missing = missing(reference, target);
    let obsolete = target
        .keys()
        .filter(|key| !reference.contains_key(key))
        .map(str::to_string)
        .collect();
    DiffReport {
        present: reference.len() - missing.len(),
        missing,
        obsolete,
    }
}

/// Outcome of a merge: which offered keys were appended and which were
/// dropped because the target (or an earlier offered entry) already had them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeReport {
    pub appended: Vec<String>,
    pub kept: Vec<String>,
}

/// Appends every entry whose key is not yet in `target`. Existing values are
/// authoritative and appended entries keep their relative order.
pub fn merge<I>(target: Catalog, new_entries: I) -> Catalog
where
    I: IntoIterator<Item = ResourceEntry>,
{
    target.with_appended(new_entries)
}

/// Same as [`merge`], also reporting which keys were appended or dropped.
pub fn merge_with_report<I>(mut target: Catalog, new_entries: I) -> (Catalog, MergeReport)
where
    I: IntoIterator<Item = ResourceEntry>,
{
    let mut report = MergeReport::default();
    for entry in new_entries {
        let key = entry.key.clone();
        if target.push(entry) {
            report.appended.push(key);
        } else {
            report.kept.push(key);
        }
    }
    (target, report)
}

/// An entry whose text is not in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscapeIssue {
    pub key: String,
    pub original: String,
    pub normalized: String,
}

/// Lists every entry that [`Normalizer::normalize`] would change, in catalog
/// order.
pub fn escape_issues(catalog: &Catalog, normalizer: &Normalizer) -> Vec<EscapeIssue> {
    catalog
        .entries()
        .iter()
        .filter_map(|entry| {
            let original = entry.text.as_deref()?;
            let normalized = normalizer.normalize(original);
            (normalized != original).then(|| EscapeIssue {
                key: entry.key.clone(),
                original: original.to_string(),
                normalized,
            })
        })
        .collect()
}

/// Missing-key summary for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleStatus {
    pub locale: String,
    pub total: usize,
    pub missing: Vec<String>,
}

/// Completeness report over several locales.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyReport {
    pub reference_keys: usize,
    pub locales: Vec<LocaleStatus>,
}

impl VerifyReport {
    /// True when no locale is missing any reference key.
    pub fn is_success(&self) -> bool {
        self.locales.iter().all(|status| status.missing.is_empty())
    }

    pub fn total_missing(&self) -> usize {
        self.locales.iter().map(|status| status.missing.len()).sum()
    }
}

/// Checks every `(locale, catalog)` pair against `reference`. Locales listed
/// in `skip` are left out of the report. Only translatable reference entries
/// count.
pub fn verify<'a, I>(reference: &Catalog, locales: I, skip: &[String]) -> VerifyReport
where
    I: IntoIterator<Item = (&'a str, &'a Catalog)>,
{
    let skip: HashSet<&str> = skip.iter().map(String::as_str).collect();
    let translatable: Catalog = reference
        .entries()
        .iter()
        .filter(|entry| entry.is_translatable())
        .cloned()
        .collect();

    let mut report = VerifyReport {
        reference_keys: translatable.len(),
        ..VerifyReport::default()
    };
    for (locale, catalog) in locales {
        if skip.contains(locale) {
            continue;
        }
        let missing: Vec<String> = missing(&translatable, catalog)
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        tracing::debug!(locale, missing = missing.len(), "verified locale");
        report.locales.push(LocaleStatus {
            locale: locale.to_string(),
            total: catalog.len(),
            missing,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::EscapePolicy;

    fn catalog(pairs: &[(&str, &str)]) -> Catalog {
        pairs
            .iter()
            .map(|(k, v)| ResourceEntry::new(*k, *v))
            .collect()
    }

    #[test]
    fn test_missing_in_reference_order() {
        let reference = catalog(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let target = catalog(&[("b", "2")]);
        assert_eq!(
            missing(&reference, &target),
            vec![ResourceEntry::new("a", "1"), ResourceEntry::new("c", "3")]
        );
    }

    #[test]
    fn test_missing_ignores_value_differences_and_target_order() {
        let reference = catalog(&[("a", "1"), ("b", "2")]);
        let target = catalog(&[("b", "deux"), ("a", "un")]);
        assert!(missing(&reference, &target).is_empty());
    }

    #[test]
    fn test_missing_keeps_absent_text() {
        let reference = Catalog::from_entries(vec![ResourceEntry::absent("x")]);
        assert_eq!(
            missing(&reference, &Catalog::new()),
            vec![ResourceEntry::absent("x")]
        );
    }

    #[test]
    fn test_diff_counts() {
        let reference = catalog(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let target = catalog(&[("z", "old"), ("b", "2")]);
        let report = diff(&reference, &target);
        assert_eq!(report.present, 1);
        assert_eq!(report.obsolete, vec!["z".to_string()]);
        assert_eq!(report.missing.len(), 2);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_merge_never_clobbers() {
        let target = catalog(&[("a", "old")]);
        let merged = merge(
            target,
            vec![ResourceEntry::new("a", "new"), ResourceEntry::new("b", "b-val")],
        );
        assert_eq!(merged, catalog(&[("a", "old"), ("b", "b-val")]));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let target = catalog(&[("a", "1")]);
        let batch = vec![
            ResourceEntry::new("b", "2"),
            ResourceEntry::absent("c"),
            ResourceEntry::new("b", "dup"),
        ];
        let once = merge(target, batch.clone());
        let twice = merge(once.clone(), batch);
        assert_eq!(once, twice);
        assert_eq!(once.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(once.text("b"), Some("2"));
    }

    #[test]
    fn test_merge_with_report() {
        let target = catalog(&[("a", "old")]);
        let (merged, report) = merge_with_report(
            target,
            vec![
                ResourceEntry::new("a", "new"),
                ResourceEntry::new("b", "1"),
                ResourceEntry::new("b", "2"),
            ],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(report.appended, vec!["b"]);
        assert_eq!(report.kept, vec!["a", "b"]);
    }

    #[test]
    fn test_escape_issues() {
        let catalog = Catalog::from_entries(vec![
            ResourceEntry::new("ok", r"It\'s fine"),
            ResourceEntry::new("raw", "It's raw"),
            ResourceEntry::new("args", "%s of %s"),
            ResourceEntry::absent("none"),
        ]);
        let issues = escape_issues(&catalog, &Normalizer::new(EscapePolicy::Backslash));
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["raw", "args"]);
        assert_eq!(issues[0].normalized, r"It\'s raw");
        assert_eq!(issues[1].normalized, "%1$s of %2$s");
    }

    #[test]
    fn test_verify_reports_per_locale() {
        let reference = Catalog::from_entries(vec![
            ResourceEntry::new("a", "1"),
            ResourceEntry::new("b", "2"),
            ResourceEntry::new("app_name", "App").with_translatable(Some(false)),
        ]);
        let fr = catalog(&[("a", "un"), ("b", "deux")]);
        let de = catalog(&[("a", "eins")]);
        let es = Catalog::new();
        let skip = vec!["es".to_string()];
        let report = verify(
            &reference,
            vec![("fr", &fr), ("de", &de), ("es", &es)],
            &skip,
        );
        assert_eq!(report.reference_keys, 2);
        assert_eq!(report.locales.len(), 2);
        assert!(report.locales[0].missing.is_empty());
        assert_eq!(report.locales[1].missing, vec!["b"]);
        assert_eq!(report.total_missing(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_verify_report_serialization() {
        let report = VerifyReport {
            reference_keys: 1,
            locales: vec![LocaleStatus {
                locale: "fr".to_string(),
                total: 1,
                missing: vec![],
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["locales"][0]["locale"], "fr");
        assert!(report.is_success());
    }
}
