//! Character maps used for script transliteration.
//!
//! A [`CharacterMap`] is immutable configuration: it is built once (from the
//! built-in tables or a JSON file) and then passed by reference to
//! [`crate::transliterate::transliterate`]. Several script pairs can coexist
//! in one [`CharacterMapRegistry`].

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    io::BufRead,
    path::Path,
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    error::Error,
    token::{ENTITY_INTRODUCER, ESCAPE_MARKER, PLACEHOLDER_INTRODUCER},
};

/// Case-sensitive mapping from one source character to a destination
/// character or glyph cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMap {
    table: HashMap<char, String>,
}

impl CharacterMap {
    /// Builds a map, rejecting characters reserved by the tokenizer and
    /// empty substitutions.
    pub fn new<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        let mut table = HashMap::new();
        for (source, target) in pairs {
            if matches!(
                source,
                PLACEHOLDER_INTRODUCER | ESCAPE_MARKER | ENTITY_INTRODUCER
            ) {
                return Err(Error::InvalidCharacterMap(format!(
                    "`{}` is reserved and cannot be mapped",
                    source
                )));
            }
            let target = target.into();
            if target.is_empty() {
                return Err(Error::InvalidCharacterMap(format!(
                    "`{}` maps to an empty string",
                    source
                )));
            }
            table.insert(source, target);
        }
        Ok(CharacterMap { table })
    }

    /// Reads a map from a JSON object whose keys are single characters and
    /// whose values are the substitutions, e.g. `{"a": "а", "b": "б"}`.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let raw: HashMap<String, String> = serde_json::from_reader(reader)?;
        let mut pairs = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => pairs.push((c, value)),
                _ => {
                    return Err(Error::InvalidCharacterMap(format!(
                        "key `{}` must be exactly one character",
                        key
                    )));
                }
            }
        }
        CharacterMap::new(pairs)
    }

    /// Reads a map from a JSON file.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// The substitution for `c`, if mapped.
    pub fn get(&self, c: char) -> Option<&str> {
        self.table.get(&c).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Latin (Fulfulde orthography) to Adlam.
    pub fn latin_to_adlam() -> Self {
        let pairs = LATIN_TO_ADLAM
            .iter()
            .map(|&(source, target)| (source, target.to_string()));
        CharacterMap {
            table: pairs.collect(),
        }
    }
}

/// Source and destination script of a character map, written `Latn-Adlm`
/// with ISO 15924 codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct ScriptPair {
    pub from: String,
    pub to: String,
}

impl ScriptPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        ScriptPair {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl FromStr for ScriptPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .trim()
            .split_once(['-', '>', ':'])
            .ok_or_else(|| Error::UnknownScriptPair(s.to_string()))?;
        let valid = |code: &str| code.len() == 4 && code.chars().all(|c| c.is_ascii_alphabetic());
        if !valid(from) || !valid(to) {
            return Err(Error::UnknownScriptPair(s.to_string()));
        }
        Ok(ScriptPair::new(title_case(from), title_case(to)))
    }
}

impl TryFrom<String> for ScriptPair {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for ScriptPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

fn title_case(code: &str) -> String {
    let lower = code.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Supplies a [`CharacterMap`] per named script pair.
pub trait CharacterMapLoader {
    fn load(&self, pair: &ScriptPair) -> Result<&CharacterMap, Error>;
}

/// Process-lifetime collection of character maps keyed by script pair.
#[derive(Debug, Clone, Default)]
pub struct CharacterMapRegistry {
    maps: HashMap<ScriptPair, CharacterMap>,
}

impl CharacterMapRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in tables.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(ScriptPair::new("Latn", "Adlm"), CharacterMap::latin_to_adlam());
        registry
    }

    /// Registers (or replaces) the map for `pair`.
    pub fn insert(&mut self, pair: ScriptPair, map: CharacterMap) {
        self.maps.insert(pair, map);
    }

    /// Loads a JSON map file and registers it under `pair`.
    pub fn load_file<P: AsRef<Path>>(&mut self, pair: ScriptPair, path: P) -> Result<(), Error> {
        let map = CharacterMap::read_from(path)?;
        tracing::debug!(%pair, entries = map.len(), "loaded character map");
        self.insert(pair, map);
        Ok(())
    }

    pub fn contains(&self, pair: &ScriptPair) -> bool {
        self.maps.contains_key(pair)
    }
}

impl CharacterMapLoader for CharacterMapRegistry {
    fn load(&self, pair: &ScriptPair) -> Result<&CharacterMap, Error> {
        self.maps
            .get(pair)
            .ok_or_else(|| Error::UnknownScriptPair(pair.to_string()))
    }
}

// Fulfulde Latin orthography to Adlam. `ñ` and `ŋ` share NYA, `ƴ` shares YA.
// `z`/`Z` take ZAL in both cases; older tables put lowercase `z` on GBE
// (U+1E940), which breaks the case pairing.
const LATIN_TO_ADLAM: &[(char, &str)] = &[
    ('a', "\u{1E922}"),
    ('A', "\u{1E900}"),
    ('b', "\u{1E926}"),
    ('B', "\u{1E904}"),
    ('ɓ', "\u{1E929}"),
    ('Ɓ', "\u{1E907}"),
    ('c', "\u{1E937}"),
    ('C', "\u{1E915}"),
    ('d', "\u{1E923}"),
    ('D', "\u{1E901}"),
    ('ɗ', "\u{1E92F}"),
    ('Ɗ', "\u{1E90D}"),
    ('e', "\u{1E92B}"),
    ('E', "\u{1E909}"),
    ('f', "\u{1E92C}"),
    ('F', "\u{1E90A}"),
    ('g', "\u{1E93A}"),
    ('G', "\u{1E918}"),
    ('h', "\u{1E938}"),
    ('H', "\u{1E916}"),
    ('i', "\u{1E92D}"),
    ('I', "\u{1E90B}"),
    ('j', "\u{1E936}"),
    ('J', "\u{1E914}"),
    ('k', "\u{1E933}"),
    ('K', "\u{1E911}"),
    ('l', "\u{1E924}"),
    ('L', "\u{1E902}"),
    ('m', "\u{1E925}"),
    ('M', "\u{1E903}"),
    ('n', "\u{1E932}"),
    ('N', "\u{1E910}"),
    ('ŋ', "\u{1E93B}"),
    ('Ŋ', "\u{1E919}"),
    ('ñ', "\u{1E93B}"),
    ('Ñ', "\u{1E919}"),
    ('o', "\u{1E92E}"),
    ('O', "\u{1E90C}"),
    ('p', "\u{1E928}"),
    ('P', "\u{1E906}"),
    ('r', "\u{1E92A}"),
    ('R', "\u{1E908}"),
    ('s', "\u{1E927}"),
    ('S', "\u{1E905}"),
    ('t', "\u{1E93C}"),
    ('T', "\u{1E91A}"),
    ('u', "\u{1E935}"),
    ('U', "\u{1E913}"),
    ('w', "\u{1E931}"),
    ('W', "\u{1E90F}"),
    ('y', "\u{1E934}"),
    ('Y', "\u{1E912}"),
    ('ƴ', "\u{1E934}"),
    ('Ƴ', "\u{1E912}"),
    ('z', "\u{1E941}"),
    ('Z', "\u{1E91F}"),
    ('0', "\u{1E950}"),
    ('1', "\u{1E951}"),
    ('2', "\u{1E952}"),
    ('3', "\u{1E953}"),
    ('4', "\u{1E954}"),
    ('5', "\u{1E955}"),
    ('6', "\u{1E956}"),
    ('7', "\u{1E957}"),
    ('8', "\u{1E958}"),
    ('9', "\u{1E959}"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_builtin_adlam_map() {
        let map = CharacterMap::latin_to_adlam();
        assert_eq!(map.get('a'), Some("\u{1E922}"));
        assert_eq!(map.get('A'), Some("\u{1E900}"));
        assert_eq!(map.get('7'), Some("\u{1E957}"));
        assert_eq!(map.get('ñ'), map.get('ŋ'));
        // ZAL in both cases, 0x22 apart like every other letter pair.
        assert_eq!(map.get('z'), Some("\u{1E941}"));
        assert_eq!(map.get('Z'), Some("\u{1E91F}"));
        assert_eq!(map.get('q'), None);
        assert_eq!(map.get('%'), None);
    }

    #[test]
    fn test_reserved_characters_are_rejected() {
        for reserved in ['%', '\\', '&'] {
            let result = CharacterMap::new([(reserved, "x")]);
            assert!(matches!(result, Err(Error::InvalidCharacterMap(_))));
        }
    }

    #[test]
    fn test_empty_substitution_is_rejected() {
        assert!(CharacterMap::new([('a', "")]).is_err());
    }

    #[test]
    fn test_from_reader() {
        let json = r#"{"a": "а", "b": "б", "ш": "sh"}"#;
        let map = CharacterMap::from_reader(Cursor::new(json)).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get('b'), Some("б"));
        assert_eq!(map.get('ш'), Some("sh"));
    }

    #[test]
    fn test_from_reader_rejects_multichar_keys() {
        let json = r#"{"ab": "x"}"#;
        let err = CharacterMap::from_reader(Cursor::new(json)).unwrap_err();
        assert!(err.to_string().contains("exactly one character"));
    }

    #[test]
    fn test_script_pair_parsing() {
        let pair: ScriptPair = "latn-adlm".parse().unwrap();
        assert_eq!(pair, ScriptPair::new("Latn", "Adlm"));
        assert_eq!(pair.to_string(), "Latn-Adlm");
        assert_eq!("Latn>Cyrl".parse::<ScriptPair>().unwrap().to, "Cyrl");
        assert!("Latin-Adlam".parse::<ScriptPair>().is_err());
        assert!("Latn".parse::<ScriptPair>().is_err());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = CharacterMapRegistry::with_builtin();
        let adlam = ScriptPair::new("Latn", "Adlm");
        assert!(registry.load(&adlam).is_ok());

        let cyrl = ScriptPair::new("Latn", "Cyrl");
        assert!(matches!(
            registry.load(&cyrl),
            Err(Error::UnknownScriptPair(name)) if name == "Latn-Cyrl"
        ));

        registry.insert(cyrl.clone(), CharacterMap::new([('a', "а")]).unwrap());
        assert_eq!(registry.load(&cyrl).unwrap().get('a'), Some("а"));
        assert!(registry.contains(&adlam));
    }

    #[test]
    fn test_registry_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("latn-grek.json");
        std::fs::write(&path, r#"{"a": "α"}"#).unwrap();

        let mut registry = CharacterMapRegistry::new();
        let pair = ScriptPair::new("Latn", "Grek");
        registry.load_file(pair.clone(), &path).unwrap();
        assert_eq!(registry.load(&pair).unwrap().get('a'), Some("α"));
    }
}
