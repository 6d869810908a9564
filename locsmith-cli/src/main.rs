mod config;
mod formats;
mod merge;
mod missing;
mod normalize;
mod path_glob;
mod reconcile;
mod transliterate;
mod validation;
mod verify;

use clap::{Parser, Subcommand};
use locsmith::{EscapePolicy, ScriptPair};
use tracing_subscriber::EnvFilter;

use crate::merge::{MergeOptions, run_merge_command};
use crate::missing::{MissingOptions, run_missing_command};
use crate::normalize::{AuditOptions, NormalizeOptions, run_audit_command, run_normalize_command};
use crate::reconcile::{ReconcileCommandOptions, run_reconcile_command};
use crate::transliterate::{TransliterateOptions, run_transliterate_command};
use crate::verify::{VerifyOptions, run_verify_command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List reference entries missing from a target catalog.
    Missing {
        /// The reference catalog (e.g. values/strings.xml)
        #[arg(short, long)]
        reference: String,
        /// The locale catalog to check; a missing file counts as empty
        #[arg(short, long)]
        target: String,
        /// Print the missing entries as a JSON array
        #[arg(long)]
        json: bool,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Append entries from one catalog into another without overwriting.
    Merge {
        /// The catalog whose values win
        #[arg(short, long)]
        base: String,
        /// The catalog providing new entries
        #[arg(short, long)]
        new: String,
        /// Where to write the merged catalog
        #[arg(short, long)]
        output: String,
    },

    /// Canonicalize escaping and renumber ambiguous placeholders.
    Normalize {
        /// Input catalogs (glob patterns allowed)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,
        /// Output file (single input only); defaults to rewriting in place
        #[arg(short, long)]
        output: Option<String>,
        /// Escaping applied to apostrophes and quotes
        #[arg(long, default_value = "backslash", value_parser = parse_policy)]
        policy: EscapePolicy,
        /// Report files that need normalization without writing them
        #[arg(long)]
        check: bool,
    },

    /// Report entries with escaping problems or ambiguous placeholders.
    Audit {
        /// Input catalogs (glob patterns allowed)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,
        #[arg(long, default_value = "backslash", value_parser = parse_policy)]
        policy: EscapePolicy,
        #[arg(long)]
        json: bool,
    },

    /// Convert a catalog to another script, keeping placeholders and escapes.
    Transliterate {
        #[arg(short, long)]
        input: String,
        #[arg(short, long)]
        output: String,
        /// Script pair such as Latn-Adlm
        #[arg(short, long, value_parser = parse_script)]
        script: ScriptPair,
        /// JSON character map file replacing the built-in table
        #[arg(short, long)]
        map: Option<String>,
    },

    /// Check that every locale of a res directory is complete.
    Verify {
        /// The res directory holding values*/strings.xml
        #[arg(short, long)]
        res: String,
        /// Locale qualifiers to ignore
        #[arg(long, num_args = 1..)]
        skip: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Bring every locale of a res directory in line with the reference.
    Reconcile {
        /// The res directory; defaults to the one implied by locsmith.toml
        #[arg(short, long)]
        res: Option<String>,
        /// Configuration file (defaults to ./locsmith.toml when present)
        #[arg(short, long)]
        config: Option<String>,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },
}

fn parse_policy(s: &str) -> Result<EscapePolicy, String> {
    s.parse().map_err(|e: locsmith::Error| e.to_string())
}

fn parse_script(s: &str) -> Result<ScriptPair, String> {
    s.parse().map_err(|e: locsmith::Error| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Missing {
            reference,
            target,
            json,
            output,
        } => run_missing_command(MissingOptions {
            reference,
            target,
            json,
            output,
        }),
        Commands::Merge { base, new, output } => {
            run_merge_command(MergeOptions { base, new, output })
        }
        Commands::Normalize {
            input,
            output,
            policy,
            check,
        } => run_normalize_command(NormalizeOptions {
            inputs: input,
            output,
            policy,
            check,
        }),
        Commands::Audit {
            input,
            policy,
            json,
        } => run_audit_command(AuditOptions {
            inputs: input,
            policy,
            json,
        }),
        Commands::Transliterate {
            input,
            output,
            script,
            map,
        } => run_transliterate_command(TransliterateOptions {
            input,
            output,
            script,
            map,
        }),
        Commands::Verify { res, skip, json } => {
            run_verify_command(VerifyOptions { res, skip, json })
        }
        Commands::Reconcile {
            res,
            config,
            dry_run,
            json,
        } => run_reconcile_command(ReconcileCommandOptions {
            res,
            config,
            dry_run,
            json,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
