use std::path::{Path, PathBuf};

use crate::config::LocsmithConfig;
use crate::validation::validate_res_dir;
use locsmith::reconcile::{EntrySource, ReconcileReport};
use locsmith::{ResDir, reconcile_dir};

#[derive(Debug, Clone)]
pub struct ReconcileCommandOptions {
    pub res: Option<String>,
    pub config: Option<String>,
    pub dry_run: bool,
    pub json: bool,
}

fn describe_source(source: &EntrySource) -> String {
    match source {
        EntrySource::Translated => "translated".to_string(),
        EntrySource::Transliterated { from, script } => format!("{} from {}", script, from),
        EntrySource::Mirrored { from } => format!("mirror of {}", from),
    }
}

fn render_human(report: &ReconcileReport, dry_run: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "=== Reconcile{} ===",
        if dry_run { " (dry run)" } else { "" }
    ));
    lines.push(format!("Reference keys: {}", report.reference_keys));
    for outcome in &report.locales {
        lines.push(format!(
            "  {} [{}]: +{} appended, {} repaired{}",
            outcome.locale,
            describe_source(&outcome.source),
            outcome.appended.len(),
            outcome.repaired,
            if outcome.written { ", written" } else { "" }
        ));
        if !outcome.obsolete.is_empty() {
            lines.push(format!("    obsolete: {}", outcome.obsolete.join(", ")));
        }
    }
    if !report.skipped.is_empty() {
        lines.push(format!("Skipped: {}", report.skipped.join(", ")));
    }
    lines.push(format!(
        "Totals: appended={}, repaired={}",
        report.total_appended(),
        report.total_repaired()
    ));
    lines.join("\n")
}

/// Run a full reconciliation of a `res/` tree.
///
/// `--res` wins over the `reference` configured in `locsmith.toml`.
pub fn run_reconcile_command(opts: ReconcileCommandOptions) -> Result<(), String> {
    let config = LocsmithConfig::discover(opts.config.as_deref())?;
    let config_base = opts
        .config
        .as_deref()
        .and_then(|path| Path::new(path).parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let res: PathBuf = match (&opts.res, config.res_dir(&config_base)) {
        (Some(res), _) => PathBuf::from(res),
        (None, Some(res)) => res,
        (None, None) => {
            return Err("No res directory: pass --res or set `reference` in locsmith.toml".to_string());
        }
    };
    validate_res_dir(&res.to_string_lossy())?;

    let registry = config.registry(&config_base)?;
    let translator = config.translator.build();
    let options = config.reconcile_options().with_dry_run(opts.dry_run);

    let report = reconcile_dir(&ResDir::new(res), translator.as_ref(), &registry, &options)
        .map_err(|e| e.to_string())?;

    if opts.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize reconcile report: {}", e))?;
        println!("{}", rendered);
    } else {
        println!("{}", render_human(&report, opts.dry_run));
    }
    Ok(())
}
