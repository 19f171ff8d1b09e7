//! Tallysheet - spreadsheet formula evaluator for the command line

mod repl;

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tallysheet_core::{CellRef, Config, Document};
use tallysheet_engine::engine::display_result;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tallysheet")]
#[command(
    version,
    about = "Evaluate spreadsheet formulas (SUM, AVERAGE, SQRT, + - * /) over a grid of cells",
    long_about = "Evaluate spreadsheet formulas over a grid of cells.\n\n\
        With -c, evaluates one formula and prints the result. Without it, reads \
        REF=TEXT lines from stdin and prints every cell whose display changed; \
        lines starting with '?' are evaluated without being stored."
)]
struct Cli {
    /// Set a cell before evaluating (repeatable), e.g. --cell A1=5 --cell B1==A1*2
    #[arg(long = "cell", value_name = "REF=TEXT", value_parser = parse_assignment)]
    cells: Vec<(CellRef, String)>,

    /// Evaluate one formula and print its result (leading '=' optional)
    #[arg(short = 'c', long = "command", value_name = "FORMULA")]
    command: Option<String>,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore any config file and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Parse `REF=TEXT`. Only the first '=' separates, so `B1==A1` stores a formula.
pub(crate) fn parse_assignment(s: &str) -> std::result::Result<(CellRef, String), String> {
    let (name, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected REF=TEXT, got {:?}", s))?;
    let cell = name.trim().parse::<CellRef>()?;
    Ok((cell, text.to_string()))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let (config, warnings) = if cli.no_config {
        (Config::default(), Vec::new())
    } else {
        Config::load(cli.config.as_deref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut doc = Document::with_config(&config);
    for (cell, text) in cli.cells {
        doc.set_cell_from_input(cell, &text);
    }
    tracing::debug!(cells = doc.grid.len(), "document ready");

    if let Some(formula) = cli.command {
        let result = doc.evaluate_input(&formula);
        println!("{}", display_result(&result, doc.decimals));
        return Ok(if result.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    repl::run(&mut doc, stdin.lock(), &mut stdout)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
