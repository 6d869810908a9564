use crate::formats::{read_catalog, write_catalog};
use crate::validation::{validate_file_path, validate_output_path};
use locsmith::{CharacterMap, CharacterMapLoader, CharacterMapRegistry, ScriptPair};

#[derive(Debug, Clone)]
pub struct TransliterateOptions {
    pub input: String,
    pub output: String,
    pub script: ScriptPair,
    /// JSON map file used instead of the built-in table.
    pub map: Option<String>,
}

pub fn run_transliterate_command(opts: TransliterateOptions) -> Result<(), String> {
    validate_file_path(&opts.input)?;
    validate_output_path(&opts.output)?;

    let map = match &opts.map {
        Some(path) => {
            validate_file_path(path)?;
            CharacterMap::read_from(path).map_err(|e| format!("Failed to load {}: {}", path, e))?
        }
        None => CharacterMapRegistry::with_builtin()
            .load(&opts.script)
            .map_err(|e| format!("{}. Pass --map to supply a character map", e))?
            .clone(),
    };

    let catalog = read_catalog(&opts.input)?;
    let converted = locsmith::transliterate_catalog(&catalog, &map);
    write_catalog(&converted, &opts.output)?;
    println!(
        "Transliterated {} entries ({}) into {}",
        converted.len(),
        opts.script,
        opts.output
    );
    Ok(())
}
