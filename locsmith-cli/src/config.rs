//! `locsmith.toml` project configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use locsmith::reconcile::{MirrorRule, TransliterationRule};
use locsmith::translate::TranslatorKind;
use locsmith::{CharacterMapRegistry, EscapePolicy, ReconcileOptions, ScriptPair};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "locsmith.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocsmithConfig {
    /// Path of the reference `strings.xml`; its grandparent is the `res/` dir.
    pub reference: Option<PathBuf>,
    #[serde(default)]
    pub escape_policy: EscapePolicy,
    #[serde(default)]
    pub skip_locales: Vec<String>,
    #[serde(default)]
    pub translator: TranslatorKind,
    #[serde(default)]
    pub skip_placeholder_strings: bool,
    #[serde(default)]
    pub include_untranslatable: bool,
    #[serde(default)]
    pub transliterate: Vec<TransliterationRule>,
    #[serde(default)]
    pub mirror: Vec<MirrorRule>,
    /// Extra character maps: script pair (`Latn-Cyrl`) → JSON file.
    #[serde(default)]
    pub character_maps: BTreeMap<String, PathBuf>,
}

impl LocsmithConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid configuration: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, else `./locsmith.toml` when present, else
    /// the defaults.
    pub fn discover(path: Option<&str>) -> Result<Self, String> {
        match path {
            Some(path) => Self::load(Path::new(path)),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!("using {}", DEFAULT_CONFIG_FILE);
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The `res/` directory implied by `reference`. A relative reference is
    /// resolved against `base`, the directory of the configuration file.
    pub fn res_dir(&self, base: &Path) -> Option<PathBuf> {
        let reference = base.join(self.reference.as_deref()?);
        let values = reference.parent()?;
        values.parent().map(Path::to_path_buf)
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        let mut options = ReconcileOptions::new()
            .with_escape_policy(self.escape_policy)
            .with_skip_locales(self.skip_locales.clone())
            .with_skip_placeholder_strings(self.skip_placeholder_strings)
            .with_include_untranslatable(self.include_untranslatable);
        for rule in &self.transliterate {
            options = options.with_transliteration(rule.clone());
        }
        for rule in &self.mirror {
            options = options.with_mirror(rule.clone());
        }
        options
    }

    /// Built-in maps plus every configured map file. Relative map paths are
    /// resolved against `base`.
    pub fn registry(&self, base: &Path) -> Result<CharacterMapRegistry, String> {
        let mut registry = CharacterMapRegistry::with_builtin();
        for (pair, file) in &self.character_maps {
            let pair: ScriptPair = pair.parse().map_err(|e| format!("{}", e))?;
            let file = base.join(file);
            registry
                .load_file(pair, &file)
                .map_err(|e| format!("Failed to load {}: {}", file.display(), e))?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
reference = "app/src/main/res/values/strings.xml"
escape_policy = "entity"
skip_locales = ["fr", "b+es+419"]
translator = { kind = "marker", marker = "TODO: " }
skip_placeholder_strings = true

[[transliterate]]
source = "b+ff+Latn"
target = "b+ff+Adlm"
script = "Latn-Adlm"

[[mirror]]
source = "b+ff+Latn"
target = "b+fuf+Latn"
"#;

    #[test]
    fn test_relative_reference_resolves_against_config_dir() {
        let config = LocsmithConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(
            config.res_dir(Path::new("/work/project")),
            Some(PathBuf::from("/work/project/app/src/main/res"))
        );

        let absolute =
            LocsmithConfig::from_toml_str("reference = \"/srv/app/res/values/strings.xml\"")
                .unwrap();
        assert_eq!(
            absolute.res_dir(Path::new("/work/project")),
            Some(PathBuf::from("/srv/app/res"))
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config = LocsmithConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.escape_policy, EscapePolicy::Entity);
        assert_eq!(config.skip_locales, vec!["fr", "b+es+419"]);
        assert_eq!(
            config.translator,
            TranslatorKind::Marker {
                marker: "TODO: ".to_string()
            }
        );
        assert_eq!(
            config.res_dir(Path::new("")),
            Some(PathBuf::from("app/src/main/res"))
        );

        let options = config.reconcile_options();
        assert!(options.skip_placeholder_strings);
        assert_eq!(options.transliterations.len(), 1);
        assert_eq!(options.transliterations[0].script.to_string(), "Latn-Adlm");
        assert_eq!(options.mirrors[0].target, "b+fuf+Latn");
    }

    #[test]
    fn test_defaults() {
        let config = LocsmithConfig::from_toml_str("").unwrap();
        assert_eq!(config.escape_policy, EscapePolicy::Backslash);
        assert_eq!(config.translator, TranslatorKind::default());
        assert!(config.res_dir(Path::new("")).is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(LocsmithConfig::from_toml_str("escape_policy = \"html\"").is_err());
        assert!(LocsmithConfig::from_toml_str("unknown_key = 1").is_err());
        let bad_script = "[[transliterate]]\nsource = \"a\"\ntarget = \"b\"\nscript = \"Latin\"";
        assert!(LocsmithConfig::from_toml_str(bad_script).is_err());
    }

    #[test]
    fn test_registry_loads_map_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("cyrl.json"), r#"{"a": "а", "b": "б"}"#).unwrap();
        let config =
            LocsmithConfig::from_toml_str("[character_maps]\n\"Latn-Cyrl\" = \"cyrl.json\"")
                .unwrap();
        let registry = config.registry(dir.path()).unwrap();
        assert!(registry.contains(&"Latn-Cyrl".parse().unwrap()));
        assert!(registry.contains(&"Latn-Adlm".parse().unwrap()));
    }
}
