use std::path::PathBuf;

use clap::Parser;

use rebrand::config::load_rules;
use rebrand::log_status;
use rebrand::patch::{self, PatchOptions, Silent};
use rebrand::rules::builtin_table;
use rebrand::{Error, Result, RuleTable};

mod output;

use output::TextReporter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "rebrand")]
#[command(version = VERSION)]
#[command(about = "Rewrite MinIO brand and URL references in built console JS bundles")]
struct Cli {
    /// Console root directory (defaults to the current working directory)
    root: Option<PathBuf>,

    /// Load the substitution table from a TOML rules file
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as a JSON envelope
    #[arg(long)]
    json: bool,

    /// Print the active substitution table and exit
    #[arg(long)]
    list_rules: bool,
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => std::env::current_dir().map_err(|e| {
            Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
        }),
    }
}

fn load_table(rules: Option<&PathBuf>) -> Result<RuleTable> {
    match rules {
        Some(path) => {
            let table = load_rules(path)?;
            log_status!("rebrand", "Loaded {} rules from {}", table.len(), path.display());
            Ok(table)
        }
        None => builtin_table(),
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let table = load_table(cli.rules.as_ref())?;

    if cli.list_rules {
        if cli.json {
            output::print_result(&Ok(table.summaries()))?;
        } else {
            output::print_rules(&table)?;
        }
        return Ok(0);
    }

    let root = resolve_root(cli.root.clone())?;
    let options = PatchOptions {
        dry_run: cli.dry_run,
    };
    if options.dry_run {
        log_status!("rebrand", "Dry run: files will not be written");
    }

    if cli.json {
        let report = patch::run(&root, &table, options, &mut Silent)?;
        output::print_result(&Ok(report))?;
    } else {
        let mut reporter = TextReporter::stdout();
        let report = patch::run(&root, &table, options, &mut reporter)?;
        reporter.summary(&report)?;
    }

    Ok(0)
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            if cli.json {
                let _ = output::print_result::<()>(&Err(err.clone()));
            } else {
                output::print_error(&err);
            }
            output::exit_code_for_error(err.code)
        }
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
