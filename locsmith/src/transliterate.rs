//! Script transliteration through the tokenizer.
//!
//! Only [`Token::Literal`] characters are looked up in the map; escapes and
//! placeholders are copied byte for byte.

use crate::{
    charmap::CharacterMap,
    token::{Token, Tokens},
    types::{Catalog, ResourceEntry},
};

/// Transliterates `text` with `map`, leaving escapes and placeholders intact.
///
/// ```rust
/// use locsmith::{CharacterMap, transliterate};
///
/// let map = CharacterMap::new([('a', "α"), ('s', "σ")]).unwrap();
/// assert_eq!(transliterate("%1$s as %s", &map), "%1$s ασ %s");
/// ```
pub fn transliterate(text: &str, map: &CharacterMap) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for token in Tokens::new(text) {
        match token {
            Token::Literal(c) => match map.get(c) {
                Some(substitute) => out.push_str(substitute),
                None => out.push(c),
            },
            other => other.push_raw(&mut out),
        }
    }
    out
}

/// Transliterates every entry of `catalog`, keeping keys, order and absent
/// values.
pub fn transliterate_catalog(catalog: &Catalog, map: &CharacterMap) -> Catalog {
    let entries = catalog.entries().iter().map(|entry| ResourceEntry {
        key: entry.key.clone(),
        text: entry.text.as_deref().map(|text| transliterate(text, map)),
        translatable: entry.translatable,
    });
    Catalog::from_entries(entries).with_locale(catalog.locale().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::placeholders;

    fn adlam() -> CharacterMap {
        CharacterMap::latin_to_adlam()
    }

    #[test]
    fn test_plain_text_is_substituted() {
        let map = CharacterMap::new([('a', "A"), ('b', "B")]).unwrap();
        assert_eq!(transliterate("abc", &map), "ABc");
    }

    #[test]
    fn test_placeholders_survive_digit_mapping() {
        // The Adlam table maps ASCII digits, so positional indexes would be
        // corrupted if placeholders were not opaque.
        let out = transliterate("%1$s and %2$d", &adlam());
        let raws: Vec<_> = placeholders(&out).iter().map(|p| p.raw()).collect();
        assert_eq!(raws, vec!["%1$s", "%2$d"]);
        assert!(out.starts_with("%1$s "));
        assert!(out.ends_with(" %2$d"));
    }

    #[test]
    fn test_escapes_survive() {
        let out = transliterate(r"Don\'t\nstop &#39;", &adlam());
        assert!(out.contains(r"\'"));
        assert!(out.contains(r"\n"));
        assert!(out.ends_with("&#39;"));
        assert!(!out.contains('D'));
    }

    #[test]
    fn test_digits_outside_placeholders_are_mapped() {
        let out = transliterate("10 %d", &adlam());
        assert_eq!(out, "\u{1E951}\u{1E950} %d");
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        let out = transliterate("q, v! x?", &adlam());
        assert_eq!(out, "q, v! x?");
    }

    #[test]
    fn test_glyph_cluster_substitution() {
        let map = CharacterMap::new([('ш', "sh")]).unwrap();
        assert_eq!(transliterate("ш%sш", &map), "sh%ssh");
    }

    #[test]
    fn test_transliterate_catalog_keeps_structure() {
        let catalog = Catalog::from_entries(vec![
            ResourceEntry::new("greeting", "a%sb"),
            ResourceEntry::absent("todo"),
        ])
        .with_locale(Some("ff-Latn".to_string()));
        let map = CharacterMap::new([('a', "α"), ('b', "β")]).unwrap();

        let out = transliterate_catalog(&catalog, &map);
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["greeting", "todo"]);
        assert_eq!(out.text("greeting"), Some("α%sβ"));
        assert_eq!(out.get("todo"), Some(None));
        assert_eq!(out.locale(), Some("ff-Latn"));
    }
}
