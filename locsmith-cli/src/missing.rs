use crate::formats::{print_or_write, read_catalog, read_catalog_or_empty};
use crate::validation::{validate_file_path, validate_output_path};
use locsmith::operations::{DiffReport, diff};

#[derive(Debug, Clone)]
pub struct MissingOptions {
    pub reference: String,
    pub target: String,
    pub json: bool,
    pub output: Option<String>,
}

fn render_human(report: &DiffReport) -> String {
    let mut lines = Vec::new();
    lines.push("=== Missing ===".to_string());
    lines.push(format!(
        "Totals: missing={}, present={}, obsolete={}",
        report.missing.len(),
        report.present,
        report.obsolete.len()
    ));
    for entry in &report.missing {
        lines.push(format!("  {}", entry));
    }
    if !report.obsolete.is_empty() {
        lines.push(format!("Obsolete keys: {}", report.obsolete.join(", ")));
    }
    lines.join("\n")
}

pub fn run_missing_command(opts: MissingOptions) -> Result<(), String> {
    validate_file_path(&opts.reference)?;
    if let Some(output) = &opts.output {
        validate_output_path(output)?;
    }

    let reference = read_catalog(&opts.reference)?;
    let target = read_catalog_or_empty(&opts.target)?;
    let report = diff(&reference, &target);
    tracing::debug!(
        reference = %opts.reference,
        target = %opts.target,
        missing = report.missing.len(),
        "computed missing entries"
    );

    let rendered = if opts.json {
        serde_json::to_string_pretty(&report.missing)
            .map_err(|e| format!("Failed to serialize missing entries: {}", e))?
    } else {
        render_human(&report)
    };
    print_or_write(opts.output.as_ref(), &rendered)
}
