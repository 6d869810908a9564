//! Traits for format-agnostic parsing and serialization in locsmith.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::{error::Error, types::Catalog};

/// A trait for parsing and writing one concrete catalog file format.
///
/// # Example
///
/// ```rust,no_run
/// use locsmith::traits::Parser;
/// let format = locsmith::formats::android_strings::Format::read_from("values/strings.xml")?;
/// format.write_to("values-fr/strings.xml")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// Byte-level catalog serializer used by the reconciliation layer.
///
/// Implementations must round-trip: `parse(serialize(c))` yields a catalog
/// with the same entries as `c`.
pub trait CatalogSerializer {
    fn parse(&self, bytes: &[u8]) -> Result<Catalog, Error>;

    fn serialize(&self, catalog: &Catalog) -> Result<Vec<u8>, Error>;

    /// Reads and parses a catalog file.
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Catalog, Error> {
        let bytes = std::fs::read(path)?;
        self.parse(&bytes)
    }

    /// Loads a catalog, treating a missing or malformed file as empty.
    ///
    /// Other I/O failures are returned.
    fn load_or_empty<P: AsRef<Path>>(&self, path: P) -> Result<Catalog, Error> {
        let path = path.as_ref();
        match self.load(path) {
            Ok(catalog) => Ok(catalog),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "catalog does not exist yet");
                Ok(Catalog::new())
            }
            Err(e) if e.is_parse_error() => {
                tracing::warn!(path = %path.display(), error = %e, "treating malformed catalog as empty");
                Ok(Catalog::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Serializes `catalog` and writes it to `path`, keeping what the format
    /// can carry over from the file already there.
    fn store<P: AsRef<Path>>(&self, catalog: &Catalog, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        self.store_onto(catalog, path, path)
    }

    /// Like [`CatalogSerializer::store`], but takes the surrounding document
    /// from `template` instead of `path`.
    fn store_onto<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        catalog: &Catalog,
        _template: P,
        path: Q,
    ) -> Result<(), Error> {
        let bytes = self.serialize(catalog)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
