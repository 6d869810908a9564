use crate::validation::{validate_locale, validate_res_dir};
use locsmith::operations::{VerifyReport, verify};
use locsmith::{Catalog, CatalogSerializer, FormatType, ResDir};

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub res: String,
    pub skip: Vec<String>,
    pub json: bool,
}

fn render_human(report: &VerifyReport) -> String {
    let mut lines = Vec::new();
    lines.push("=== Verify ===".to_string());
    lines.push(format!("Reference keys: {}", report.reference_keys));
    for status in &report.locales {
        if status.missing.is_empty() {
            lines.push(format!("  {}: complete", status.locale));
        } else {
            lines.push(format!(
                "  {}: {} missing ({})",
                status.locale,
                status.missing.len(),
                status.missing.join(", ")
            ));
        }
    }
    lines.push(format!("Total missing: {}", report.total_missing()));
    lines.join("\n")
}

/// Check every locale of a `res/` tree for missing keys. Fails when any
/// locale is incomplete.
pub fn run_verify_command(opts: VerifyOptions) -> Result<(), String> {
    validate_res_dir(&opts.res)?;
    for locale in &opts.skip {
        validate_locale(locale)?;
    }
    let res = ResDir::new(&opts.res);
    let format = FormatType::AndroidStrings;

    let reference = format
        .load(res.reference_path())
        .map_err(|e| format!("Failed to read reference catalog: {}", e))?;
    let locales = res.locales().map_err(|e| format!("Failed to list locales: {}", e))?;
    let catalogs = locales
        .into_iter()
        .map(|locale| {
            let path = res.locale_path(&locale);
            format
                .load_or_empty(&path)
                .map(|catalog| (locale, catalog))
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
        })
        .collect::<Result<Vec<(String, Catalog)>, String>>()?;

    let report = verify(
        &reference,
        catalogs.iter().map(|(locale, catalog)| (locale.as_str(), catalog)),
        &opts.skip,
    );

    if opts.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize verify report: {}", e))?;
        println!("{}", rendered);
    } else {
        println!("{}", render_human(&report));
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} missing translation(s) across {} locale(s)",
            report.total_missing(),
            report.locales.iter().filter(|s| !s.missing.is_empty()).count()
        ))
    }
}
