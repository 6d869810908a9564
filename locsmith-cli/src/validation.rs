use locsmith::resdir::qualifier_to_langid;
use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate a `res/` directory with a `values/strings.xml` reference
pub fn validate_res_dir(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.is_dir() {
        return Err(format!("Not a directory: {}", path));
    }

    let reference = path_obj.join("values").join("strings.xml");
    if !reference.is_file() {
        return Err(format!(
            "Missing reference catalog: {}",
            reference.display()
        ));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Cannot create output directory: {}", e))?;
    }

    Ok(())
}

/// Validate a locale given either as a resource qualifier (`b+ff+Latn`,
/// `pt-rBR`) or as a BCP 47 tag (`ff-Latn`)
pub fn validate_locale(locale: &str) -> Result<(), String> {
    if locale.is_empty() {
        return Err("Locale cannot be empty".to_string());
    }

    if qualifier_to_langid(locale).is_ok() || locale.parse::<LanguageIdentifier>().is_ok() {
        return Ok(());
    }

    Err(format!(
        "Invalid locale: {}. Expected a resource qualifier or a BCP 47 language identifier",
        locale
    ))
}
