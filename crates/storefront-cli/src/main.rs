mod config;
mod terminal;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use storefront_core::{
    Catalog, RecordingView, SessionSnapshot, Storefront, TransitionLog, ViewEvent, ViewPort,
};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::terminal::TerminalView;

/// Storefront: order from the menu in your terminal
///
/// Browse the menu, build an order, and check out with a mock payment.
#[derive(Parser)]
#[command(name = "storefront", version, about, long_about = None)]
struct Cli {
    /// JSON catalog to use instead of the builtin menu
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Settings file (defaults to ./storefront.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Currency symbol used when printing prices
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the menu grouped by category
    Menu {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run ordering commands, one per line (reads stdin without FILE)
    Run {
        /// Command script
        file: Option<PathBuf>,
        /// Print the final session, transition log and view events as JSON
        #[arg(long)]
        json: bool,
        /// Continue after a rejected command instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// List the commands accepted by `run`
    Actions,

    /// Show version information
    Version,
}

/// Exit codes: 0 = success, 1 = a command was rejected, 2 = error
const EXIT_REJECTED: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            EXIT_ERROR
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        settings.catalog = Some(catalog);
    }
    if let Some(currency) = cli.currency {
        settings.currency_symbol = currency;
    }
    if cli.no_color {
        settings.color = false;
    }
    if !settings.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Menu { json } => {
            let catalog = load_catalog(&settings)?;
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.items())?);
            } else {
                let mut view = TerminalView::new(io::stdout().lock(), &settings.currency_symbol);
                view.render_catalog(&catalog.sections());
                view.finish()?;
            }
            Ok(0)
        }
        Commands::Run {
            file,
            json,
            keep_going,
        } => {
            let catalog = load_catalog(&settings)?;
            let source = read_script(file.as_deref())?;
            let commands = script_commands(&source);
            if json {
                run_json(catalog, &commands, keep_going)
            } else {
                run_terminal(catalog, &settings, &commands, keep_going)
            }
        }
        Commands::Actions => {
            for (_, usage) in storefront_core::Action::usage() {
                println!("  {}", usage);
            }
            Ok(0)
        }
        Commands::Version => {
            println!(
                "storefront {} (storefront-core {})",
                env!("CARGO_PKG_VERSION"),
                storefront_core::VERSION
            );
            Ok(0)
        }
    }
}

fn load_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    match &settings.catalog {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            let catalog = Catalog::from_json(&raw)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            Ok(catalog)
        }
        None => Ok(Catalog::builtin()),
    }
}

fn read_script(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read commands from stdin")?;
            Ok(source)
        }
    }
}

/// Non-blank, non-comment lines with their 1-based line numbers
fn script_commands(source: &str) -> Vec<(usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// A command the storefront refused
#[derive(Debug, Serialize)]
struct RejectedCommand {
    line: usize,
    command: String,
    error: String,
}

/// Output of `run --json`
#[derive(Serialize)]
struct RunReport<'a> {
    success: bool,
    rejected: Vec<RejectedCommand>,
    session: SessionSnapshot,
    transitions: &'a TransitionLog,
    events: &'a [ViewEvent],
}

/// Dispatch each command; returns the rejected ones. Stops at the first
/// rejection unless `keep_going` is set.
fn dispatch_all<V: ViewPort>(
    store: &mut Storefront<V>,
    commands: &[(usize, &str)],
    keep_going: bool,
) -> Vec<RejectedCommand> {
    let mut rejected = Vec::new();
    for &(line, command) in commands {
        if let Err(e) = store.dispatch_command(command) {
            rejected.push(RejectedCommand {
                line,
                command: redact(command),
                error: e.to_string(),
            });
            if !keep_going {
                break;
            }
        }
    }
    rejected
}

/// Command text safe to echo back; payment details are dropped
fn redact(command: &str) -> String {
    match command.split_whitespace().next() {
        Some(id) if id.eq_ignore_ascii_case("pay") => "pay <redacted>".to_string(),
        _ => command.to_string(),
    }
}

fn run_terminal(
    catalog: Catalog,
    settings: &Settings,
    commands: &[(usize, &str)],
    keep_going: bool,
) -> anyhow::Result<i32> {
    let view = TerminalView::new(io::stdout().lock(), &settings.currency_symbol);
    let mut store = Storefront::new(catalog, view);
    store.open();

    let rejected = dispatch_all(&mut store, commands, keep_going);
    store.into_view().finish()?;

    report_rejected(&rejected);
    Ok(if rejected.is_empty() { 0 } else { EXIT_REJECTED })
}

/// Echo rejected commands on stderr, in both output modes
fn report_rejected(rejected: &[RejectedCommand]) {
    for r in rejected {
        eprintln!("{}", describe_rejected(r));
    }
}

fn describe_rejected(r: &RejectedCommand) -> String {
    format!(
        "{} line {}: {}: {}",
        "error:".red().bold(),
        r.line,
        r.command,
        r.error
    )
}

fn run_json(catalog: Catalog, commands: &[(usize, &str)], keep_going: bool) -> anyhow::Result<i32> {
    let mut store = Storefront::new(catalog, RecordingView::new());
    store.open();

    let rejected = dispatch_all(&mut store, commands, keep_going);
    report_rejected(&rejected);
    let success = rejected.is_empty();
    let report = RunReport {
        success,
        rejected,
        session: store.snapshot(),
        transitions: store.transitions(),
        events: &store.view().events,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if success { 0 } else { EXIT_REJECTED })
}
