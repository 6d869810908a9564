//! Catalog file helpers shared by the commands.

use locsmith::{Catalog, CatalogSerializer, FormatType};

/// Infer the catalog format from a path extension. Defaults to Android XML.
pub fn format_for_path(path: &str) -> FormatType {
    FormatType::from_path(path).unwrap_or(FormatType::AndroidStrings)
}

/// Read a catalog, failing on missing or malformed input.
pub fn read_catalog(path: &str) -> Result<Catalog, String> {
    format_for_path(path)
        .load(path)
        .map_err(|e| format!("Failed to read {}: {}", path, e))
}

/// Read a catalog, treating a missing or malformed file as empty.
pub fn read_catalog_or_empty(path: &str) -> Result<Catalog, String> {
    format_for_path(path)
        .load_or_empty(path)
        .map_err(|e| format!("Failed to read {}: {}", path, e))
}

/// Write `catalog` to `path`, keeping the rest of the file already there.
pub fn write_catalog(catalog: &Catalog, path: &str) -> Result<(), String> {
    write_catalog_onto(catalog, path, path)
}

/// Write `catalog` to `path`, taking the rest of the document from
/// `template` when both share a format.
pub fn write_catalog_onto(catalog: &Catalog, template: &str, path: &str) -> Result<(), String> {
    let format = format_for_path(path);
    let template = if format_for_path(template) == format {
        template
    } else {
        path
    };
    format
        .store_onto(catalog, template, path)
        .map_err(|e| format!("Failed to write {}: {}", path, e))
}

/// Print to stdout or write to `output` when given.
pub fn print_or_write(output: Option<&String>, content: &str) -> Result<(), String> {
    if let Some(path) = output {
        std::fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        println!("Report written: {}", path);
    } else {
        println!("{}", content);
    }
    Ok(())
}
