use analytics::{AnalysisResult, HistoryPoint, VolatilityService};
use api_client::YahooChartClient;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{load_config, Settings};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

mod telemetry;

/// The main entry point for the Volscope application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // VOLSCOPE__* overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let settings = load_config(&cli.config)?;
    let _log_guard = telemetry::init(&settings.logging)?;

    let source = Arc::new(YahooChartClient::new(&settings.data_source)?);
    tracing::info!(symbol = %source.symbol(), "Data source configured.");
    let service = Arc::new(VolatilityService::from_settings(source, &settings));

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, &settings, service).await,
        Commands::Snapshot(args) => handle_snapshot(args, &settings, &service).await,
        Commands::History(args) => handle_history(args, &settings, &service).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Daily volatility-index analytics, served over HTTP or printed to the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Fetch once and print the current analysis.
    Snapshot(SnapshotArgs),
    /// Fetch once and print the trailing history with derived metrics.
    History(HistoryArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<IpAddr>,
    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct SnapshotArgs {
    /// Calendar days to fetch. Defaults to `data_source.lookback_days`.
    #[arg(long)]
    lookback_days: Option<u32>,
}

#[derive(Parser)]
struct HistoryArgs {
    /// Number of trailing rows to print. Defaults to `analysis.history_days`.
    #[arg(long)]
    days: Option<usize>,
    /// Calendar days to fetch. Defaults to `data_source.lookback_days`.
    #[arg(long)]
    lookback_days: Option<u32>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_serve(
    args: ServeArgs,
    settings: &Settings,
    service: Arc<VolatilityService>,
) -> anyhow::Result<()> {
    let host = match args.host {
        Some(host) => host,
        None => settings.server.host.parse::<IpAddr>()?,
    };
    let addr = SocketAddr::new(host, args.port.unwrap_or(settings.server.port));

    let state = Arc::new(AppState {
        service,
        history_days: settings.analysis.history_days,
    });
    web_server::run_server(addr, state).await
}

async fn handle_snapshot(
    args: SnapshotArgs,
    settings: &Settings,
    service: &VolatilityService,
) -> anyhow::Result<()> {
    let lookback = args.lookback_days.unwrap_or(settings.data_source.lookback_days);
    service.ingest_from_source(lookback).await?;
    let result = service.current_snapshot().await?;
    println!("{}", snapshot_table(&settings.data_source.symbol, &result));
    Ok(())
}

async fn handle_history(
    args: HistoryArgs,
    settings: &Settings,
    service: &VolatilityService,
) -> anyhow::Result<()> {
    let lookback = args.lookback_days.unwrap_or(settings.data_source.lookback_days);
    service.ingest_from_source(lookback).await?;
    let days = args.days.unwrap_or(settings.analysis.history_days);
    let history = service.history_slice(days).await?;
    println!("{}", history_table(&history));
    Ok(())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn snapshot_table(symbol: &str, result: &AnalysisResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![symbol, ""]);

    table.add_row(vec!["Date".to_string(), result.date.to_string()]);
    table.add_row(vec!["Close".to_string(), result.current_value.to_string()]);
    table.add_row(vec!["Level".to_string(), result.interpretation.to_string()]);
    if let (Some(change), Some(trend)) = (result.change, result.trend) {
        let pct = result
            .percent_change
            .map(|p| format!(" ({}%)", p))
            .unwrap_or_default();
        table.add_row(vec!["Change".to_string(), format!("{}{} {}", change, pct, trend)]);
    }
    if let Some(rolling) = &result.rolling {
        table.add_row(vec!["30d mean / std".to_string(), format!("{} / {}", rolling.mean, rolling.std)]);
        table.add_row(vec![
            "Z-score".to_string(),
            format!("{} ({})", rolling.z_score, rolling.z_score_interpretation),
        ]);
        table.add_row(vec!["30d percentile".to_string(), rolling.percentile.to_string()]);
    }
    table.add_row(vec!["MA crossover".to_string(), result.ma_crossover.to_string()]);
    table
}

fn history_table(history: &[HistoryPoint]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Close", "MA short", "MA long", "Change %", "Z-score"]);

    for row in history {
        table.add_row(vec![
            row.date.to_string(),
            format!("{:.2}", row.value),
            format!("{:.2}", row.ma_short),
            format!("{:.2}", row.ma_long),
            fmt_opt(row.percent_change),
            fmt_opt(row.z_score),
        ]);
    }
    table
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}
