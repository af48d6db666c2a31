use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

use isodesign::data::dataset::TargetDataset;
use isodesign::data::export::save_windows_csv;
use isodesign::session::DesignSession;

#[derive(Parser, Debug)]
#[command(author, version, about = "Isolation window design over mass spectrometry target lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the boundary lines seeded from a target list
    Summary(SummaryArgs),
    /// Auto-fill over-wide gaps between boundary lines
    Fill(FillArgs),
    /// Derive isolation windows and write the export table
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct SummaryArgs {
    /// Target list CSV
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

#[derive(Parser, Debug)]
struct FillArgs {
    /// Target list CSV
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Maximum allowed gap width between adjacent lines
    #[arg(long)]
    max_width: Option<f64>,

    /// Boundary lines overriding the Win_start seeds (comma separated)
    #[arg(long)]
    lines: Option<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Target list CSV
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long, default_value = "isolation_windows.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Boundary lines overriding the Win_start seeds (comma separated)
    #[arg(long)]
    lines: Option<String>,

    /// Run auto-fill before deriving windows
    #[arg(long, action = ArgAction::SetTrue)]
    fill: bool,

    /// Maximum allowed gap width for --fill
    #[arg(long)]
    max_width: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary(args) => run_summary(args),
        Command::Fill(args) => run_fill(args),
        Command::Export(args) => run_export(args),
    }
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let session = load_session(&args.input, None)?;
    println!("{}", session.summary());
    Ok(())
}

fn run_fill(args: FillArgs) -> Result<()> {
    let mut session = load_session(&args.input, args.lines.as_deref())?;
    let inserted = session.auto_fill(args.max_width);
    println!("{}", session.summary());
    println!("Auto-fill inserted {} new lines.", inserted);
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
    let mut session = load_session(&args.input, args.lines.as_deref())?;
    if args.fill {
        let inserted = session.auto_fill(args.max_width);
        info!(inserted, "auto-filled before export");
    }
    let records = session.export();
    save_windows_csv(&args.output, &records)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "Wrote {} window rows to {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}

fn load_session(input: &Path, lines: Option<&str>) -> Result<DesignSession> {
    let dataset = TargetDataset::from_path(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let mut session = DesignSession::new(dataset);
    if let Some(raw) = lines {
        let positions = parse_lines(raw)?;
        session
            .set_lines(&positions)
            .context("invalid --lines override")?;
    }
    Ok(session)
}

fn parse_lines(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .with_context(|| format!("invalid line position '{}': not a number", token))
        })
        .collect()
}
