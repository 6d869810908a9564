use crate::formats::{read_catalog, read_catalog_or_empty, write_catalog_onto};
use crate::validation::{validate_file_path, validate_output_path};
use locsmith::merge_with_report;

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub base: String,
    pub new: String,
    pub output: String,
}

/// Append the entries of `new` that `base` lacks and write the result.
/// Values already in `base` always win.
pub fn run_merge_command(opts: MergeOptions) -> Result<(), String> {
    validate_file_path(&opts.new)?;
    validate_output_path(&opts.output)?;

    let base = read_catalog_or_empty(&opts.base)?;
    let new = read_catalog(&opts.new)?;
    let (merged, report) = merge_with_report(base, new.into_entries());
    write_catalog_onto(&merged, &opts.base, &opts.output)?;

    println!(
        "Merged {} new entries into {} ({} kept as is)",
        report.appended.len(),
        opts.output,
        report.kept.len()
    );
    if !report.kept.is_empty() {
        tracing::debug!(kept = ?report.kept, "existing values kept");
    }
    Ok(())
}
