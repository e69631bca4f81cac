mod declaration;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flagset::ParseMode;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::declaration::{DEFAULT_DECLARATION_NAME, load_declaration, write_sample_declaration};

#[derive(Parser)]
#[command(name = "flagcheck")]
#[command(
    version,
    about = "Inspect how an argument vector parses against a flag declaration",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample flags.json
    Init(InitArgs),

    /// Parse arguments against a flag declaration and print a JSON report
    Parse(ParseArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing flags.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the flag declaration
    #[arg(short, long, default_value = DEFAULT_DECLARATION_NAME, value_name = "FILE")]
    decl: PathBuf,

    /// Fail on any argument error instead of listing it in the report
    #[arg(long)]
    diagnostic: bool,

    /// Program name placed at argv[0] (overrides the declaration)
    #[arg(long, value_name = "NAME")]
    program: Option<String>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,

    /// Arguments to parse, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    let dest = write_sample_declaration(&dir, args.force)?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {} to describe your flags", dest.display());
    eprintln!("  2. Run: flagcheck parse -d {} -- <ARGS>", display_path(&dest));

    Ok(())
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let decl = load_declaration(&args.decl)?;
    let program = args
        .program
        .or_else(|| decl.program.clone())
        .unwrap_or_else(|| "flagcheck".to_string());
    let mode = if args.diagnostic {
        ParseMode::Diagnostic
    } else {
        ParseMode::Lenient
    };

    let report = report::run(&decl, &program, &args.args, mode)?;
    let json = if args.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .context("failed to serialize parse report")?;
    println!("{json}");

    if !report.errors.is_empty() {
        tracing::warn!(errors = report.errors.len(), "argument vector has errors");
    }
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
