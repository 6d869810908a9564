use crate::formats::{read_catalog, write_catalog_onto};
use crate::path_glob::expand_input_globs;
use crate::validation::{validate_file_path, validate_output_path};
use locsmith::operations::escape_issues;
use locsmith::{EscapePolicy, Normalizer};

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub inputs: Vec<String>,
    pub output: Option<String>,
    pub policy: EscapePolicy,
    pub check: bool,
}

/// Normalize catalogs in place (or into `output` for a single input).
/// With `check`, nothing is written and the command fails when any file
/// would change.
pub fn run_normalize_command(opts: NormalizeOptions) -> Result<(), String> {
    let inputs = expand_input_globs(&opts.inputs)?;
    if opts.output.is_some() && inputs.len() != 1 {
        return Err("--output requires exactly one input file".to_string());
    }
    if let Some(output) = &opts.output {
        validate_output_path(output)?;
    }

    let normalizer = Normalizer::new(opts.policy);
    let mut dirty = Vec::new();
    for input in &inputs {
        validate_file_path(input)?;
        let catalog = read_catalog(input)?;
        let issues = escape_issues(&catalog, &normalizer);
        tracing::debug!(file = %input, issues = issues.len(), "normalized");

        if opts.check {
            if !issues.is_empty() {
                println!("{}: {} entries need normalization", input, issues.len());
                dirty.push(input.clone());
            }
            continue;
        }

        let target = opts.output.as_ref().unwrap_or(input);
        if issues.is_empty() && target == input {
            continue;
        }
        write_catalog_onto(&normalizer.normalize_catalog(&catalog), input, target)?;
        println!("{}: normalized {} entries", target, issues.len());
    }

    if !dirty.is_empty() {
        return Err(format!("{} file(s) are not normalized", dirty.len()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub inputs: Vec<String>,
    pub policy: EscapePolicy,
    pub json: bool,
}

/// List entries with escaping problems or ambiguous placeholders.
pub fn run_audit_command(opts: AuditOptions) -> Result<(), String> {
    let inputs = expand_input_globs(&opts.inputs)?;
    let normalizer = Normalizer::new(opts.policy);

    let mut files = Vec::new();
    for input in &inputs {
        validate_file_path(input)?;
        let catalog = read_catalog(input)?;
        let issues = escape_issues(&catalog, &normalizer);
        files.push(serde_json::json!({ "file": input, "issues": issues }));

        if !opts.json {
            println!("{}: {} issue(s)", input, issues.len());
            for issue in &issues {
                println!("  {}: {:?} -> {:?}", issue.key, issue.original, issue.normalized);
            }
        }
    }

    if opts.json {
        let rendered = serde_json::to_string_pretty(&files)
            .map_err(|e| format!("Failed to serialize audit report: {}", e))?;
        println!("{}", rendered);
    }
    Ok(())
}
