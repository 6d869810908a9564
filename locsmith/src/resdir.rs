//! Android `res/` directory layout.
//!
//! The reference catalog lives in `values/strings.xml`; every locale has its
//! own `values-<qualifier>/strings.xml`. Qualifiers are either the legacy
//! form (`fr`, `pt-rBR`) or the BCP 47 form (`b+ff+Latn`).

use std::path::{Path, PathBuf};

use unic_langid::LanguageIdentifier;

use crate::error::Error;

pub const STRINGS_FILE: &str = "strings.xml";
const VALUES_DIR: &str = "values";

/// A `res/` directory holding one reference and many locale catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResDir {
    root: PathBuf,
}

impl ResDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        ResDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `values/strings.xml`.
    pub fn reference_path(&self) -> PathBuf {
        self.root.join(VALUES_DIR).join(STRINGS_FILE)
    }

    /// `values-<qualifier>/strings.xml`, whether or not it exists.
    pub fn locale_path(&self, qualifier: &str) -> PathBuf {
        self.root
            .join(format!("{}-{}", VALUES_DIR, qualifier))
            .join(STRINGS_FILE)
    }

    /// Locale qualifiers that have a `strings.xml`, sorted. Directories whose
    /// qualifier is not a locale (`values-night`, `values-v21`) are skipped.
    pub fn locales(&self) -> Result<Vec<String>, Error> {
        let mut locales = Vec::new();
        for dir in std::fs::read_dir(&self.root)? {
            let dir = dir?;
            if !dir.file_type()?.is_dir() {
                continue;
            }
            let name = dir.file_name();
            let Some(qualifier) = name.to_str().and_then(qualifier_of) else {
                continue;
            };
            if qualifier_to_langid(qualifier).is_err() {
                tracing::debug!(qualifier, "skipping non-locale values directory");
                continue;
            }
            if dir.path().join(STRINGS_FILE).is_file() {
                locales.push(qualifier.to_string());
            }
        }
        locales.sort();
        Ok(locales)
    }
}

/// `values-fr` → `fr`. Returns `None` for `values` and unrelated names.
pub fn qualifier_of(dir_name: &str) -> Option<&str> {
    dir_name
        .strip_prefix(VALUES_DIR)?
        .strip_prefix('-')
        .filter(|q| !q.is_empty())
}

/// Parses a resource qualifier into a language identifier.
///
/// ```rust
/// use locsmith::resdir::qualifier_to_langid;
///
/// assert_eq!(qualifier_to_langid("b+ff+Latn").unwrap().to_string(), "ff-Latn");
/// assert_eq!(qualifier_to_langid("pt-rBR").unwrap().to_string(), "pt-BR");
/// ```
pub fn qualifier_to_langid(qualifier: &str) -> Result<LanguageIdentifier, Error> {
    let invalid = || Error::InvalidLocale(qualifier.to_string());
    let tag = match qualifier.strip_prefix("b+") {
        Some(bcp47) => bcp47.replace('+', "-"),
        None => {
            let (language, region) = match qualifier.split_once('-') {
                Some((language, region)) => (language, Some(region)),
                None => (qualifier, None),
            };
            if !(2..=3).contains(&language.len()) {
                return Err(invalid());
            }
            match region {
                Some(region) => format!("{}-{}", language, region.strip_prefix('r').ok_or_else(invalid)?),
                None => language.to_string(),
            }
        }
    };
    tag.parse::<LanguageIdentifier>().map_err(|_| invalid())
}

/// Inverse of [`qualifier_to_langid`]: tags with a script or variant use the
/// `b+` form, others the legacy form.
pub fn langid_to_qualifier(langid: &LanguageIdentifier) -> String {
    let language = langid.language.as_str();
    if langid.script.is_some() || langid.variants().next().is_some() {
        return format!("b+{}", langid.to_string().replace('-', "+"));
    }
    match langid.region {
        Some(region) => format!("{}-r{}", language, region.as_str()),
        None => language.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_qualifier_of() {
        assert_eq!(qualifier_of("values-fr"), Some("fr"));
        assert_eq!(qualifier_of("values-b+ff+Latn"), Some("b+ff+Latn"));
        assert_eq!(qualifier_of("values"), None);
        assert_eq!(qualifier_of("values-"), None);
        assert_eq!(qualifier_of("drawable-hdpi"), None);
    }

    #[test]
    fn test_qualifier_to_langid() {
        assert_eq!(qualifier_to_langid("fr").unwrap().to_string(), "fr");
        assert_eq!(qualifier_to_langid("zh-rTW").unwrap().to_string(), "zh-TW");
        assert_eq!(qualifier_to_langid("b+es+419").unwrap().to_string(), "es-419");
        assert_eq!(qualifier_to_langid("b+fuf+Adlm").unwrap().to_string(), "fuf-Adlm");
        assert!(qualifier_to_langid("night").is_err());
        assert!(qualifier_to_langid("v21").is_err());
        assert!(qualifier_to_langid("en-US").is_err());
    }

    #[test]
    fn test_langid_to_qualifier() {
        for q in ["fr", "pt-rBR", "b+ff+Latn", "b+fuf+Adlm"] {
            let langid = qualifier_to_langid(q).unwrap();
            assert_eq!(langid_to_qualifier(&langid), q);
        }
    }

    #[test]
    fn test_locales_discovery() {
        let dir = TempDir::new().unwrap();
        let res = ResDir::new(dir.path());
        for name in ["values", "values-fr", "values-b+ff+Latn", "values-night", "values-de"] {
            let path = dir.path().join(name);
            std::fs::create_dir_all(&path).unwrap();
            if name != "values-de" {
                std::fs::write(path.join(STRINGS_FILE), "<resources/>").unwrap();
            }
        }
        assert_eq!(res.locales().unwrap(), vec!["b+ff+Latn", "fr"]);
        assert_eq!(res.reference_path(), dir.path().join("values").join("strings.xml"));
        assert_eq!(
            res.locale_path("br"),
            dir.path().join("values-br").join("strings.xml")
        );
    }

    #[test]
    fn test_locales_on_missing_root() {
        let res = ResDir::new("/definitely/not/here");
        assert!(matches!(res.locales(), Err(Error::Io(_))));
    }
}
