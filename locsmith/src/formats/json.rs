//! Plain JSON catalogs: an array of `{ "key", "text", "translatable" }`
//! objects in catalog order.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    traits::Parser,
    types::{Catalog, ResourceEntry},
};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Format {
    pub entries: Vec<ResourceEntry>,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Json)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl From<&Catalog> for Format {
    fn from(value: &Catalog) -> Self {
        Format {
            entries: value.entries().to_vec(),
        }
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        Catalog::from_entries(value.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_entry_array() {
        let json = indoc! {r#"
            [
              { "key": "hello", "text": "Hello" },
              { "key": "declared" },
              { "key": "app_name", "text": "Contacts", "translatable": false }
            ]
        "#};
        let catalog = Catalog::from(Format::from_bytes(json.as_bytes()).unwrap());
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["hello", "declared", "app_name"]);
        assert_eq!(catalog.get("declared"), Some(None));
        assert!(!catalog.entry("app_name").unwrap().is_translatable());
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            Format::from_bytes(br#"{"hello": "Hello"}"#),
            Err(Error::Json(_))
        ));
        assert!(Format::from_bytes(b"").is_err());
    }

    #[test]
    fn test_writes_pretty_array() {
        let catalog = Catalog::from_entries(vec![ResourceEntry::new("a", "1")]);
        let mut out = Vec::new();
        Format::from(&catalog).to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains(r#""key": "a""#));
        assert!(text.ends_with("]\n"));
    }
}
