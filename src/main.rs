mod config;
mod db;
mod error;
mod ranker;
mod report;
mod scorer;
mod tui;
mod types;

use std::io::Write;
use std::path::Path;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, MAX_LIMIT};
use crate::db::models::DbOverview;
use crate::db::SnapshotReader;
use crate::error::Result;
use crate::ranker::{rank, top};
use crate::report::export::write_json;
use crate::scorer::ScoringPolicy;
use crate::tui::WatchState;

/// Rank tokens from the latest market snapshot
#[derive(Parser)]
#[command(name = "scanner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Snapshot database path (overrides DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the latest snapshot, print the top tokens and export them as JSON (default)
    Score(ScoreArgs),

    /// Show tables, latest snapshot timestamp and a few sample rows
    Inspect,

    /// Live terminal view of the latest ranking
    Watch,
}

#[derive(Args, Default)]
struct ScoreArgs {
    /// Do not print the table
    #[arg(long)]
    no_print: bool,

    /// Do not write the JSON export
    #[arg(long)]
    no_export_json: bool,

    /// Number of rows to print/export (default: SCORE_LIMIT or 25)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=(MAX_LIMIT as i64)))]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(db) = cli.db {
        cfg.db_path = db;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Score(ScoreArgs::default()));

    // The watch view owns the terminal; log lines would tear through it.
    let filter = match command {
        Commands::Watch => EnvFilter::new("off"),
        _ => EnvFilter::new(&cfg.log_level),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cfg, command).await {
        error!("Fatal error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cfg: Config, command: Commands) -> Result<()> {
    let reader = SnapshotReader::open(&cfg.db_path).await?;
    match command {
        Commands::Score(args) => score(&cfg, &reader, args).await,
        Commands::Inspect => inspect(&reader).await,
        Commands::Watch => {
            let mut app = WatchState::new(cfg.db_path.clone(), ScoringPolicy::DEFAULT);
            tui::run(&reader, &mut app, cfg.watch_refresh_secs).await
        }
    }
}

async fn score(cfg: &Config, reader: &SnapshotReader, args: ScoreArgs) -> Result<()> {
    let snapshot = match reader.fetch_latest().await? {
        Some(s) if !s.records.is_empty() => s,
        _ => {
            warn!("No snapshot data yet. Run the snapshot ingestion first.");
            return Ok(());
        }
    };

    let ts = snapshot.ts;
    let total = snapshot.records.len();
    let ranked = rank(snapshot.records, &ScoringPolicy::DEFAULT);
    info!(ts, tokens = total, "Snapshot scored");

    let limit = args.limit.unwrap_or(cfg.limit) as usize;
    let top = top(ranked, limit);

    if !args.no_print {
        report::print_ranking(ts, total, &top)?;
    }

    if !args.no_export_json {
        write_json(Path::new(&cfg.export_json_path), &top).await?;
        info!("Saved: {}", cfg.export_json_path);
    }

    Ok(())
}

async fn inspect(reader: &SnapshotReader) -> Result<()> {
    let overview = reader.overview().await?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_overview(&mut out, &overview)?;
    out.flush()?;
    Ok(())
}

fn write_overview(out: &mut impl Write, o: &DbOverview) -> std::io::Result<()> {
    writeln!(out, "Tables: {:?}", o.tables)?;
    match o.last_ts {
        Some(ts) => writeln!(out, "Last ts: {ts}")?,
        None => writeln!(out, "Last ts: none")?,
    }
    writeln!(out, "Rows in last snapshot: {}", o.rows_in_last_snapshot)?;
    for row in &o.sample {
        writeln!(
            out,
            "{} symbol={} decimals={} mint_authority_null={} freeze_authority_null={}",
            row.mint,
            row.symbol.as_deref().unwrap_or("null"),
            opt(row.decimals),
            opt(row.mint_authority_null),
            opt(row.freeze_authority_null),
        )?;
    }
    Ok(())
}

fn opt(v: Option<i64>) -> String {
    v.map_or_else(|| "null".to_string(), |x| x.to_string())
}
