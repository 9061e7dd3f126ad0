use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use shared::AnalyticsPeriod;
use tracing::{info, warn};

use dashboard_backend::config::DashboardConfig;
use dashboard_backend::domain::{
    AnalyticsQuery, AnalyticsService, AnalyticsSnapshot, AnalyticsState,
};
use dashboard_backend::logging::init_logging;
use dashboard_backend::storage::{JsonHistoryRepository, SessionContext};

#[derive(Parser)]
#[command(
    name = "dashboard-analytics",
    version,
    about = "Income/expense chart data for a dashboard account",
    long_about = "Reads an account's transaction history from a JSON file, aggregates it \
                  for the selected period and prints the chart series and geometry as JSON."
)]
struct Cli {
    /// JSON file with account histories
    history: PathBuf,

    /// Account name (defaults to the configured account)
    #[arg(short, long)]
    account: Option<String>,

    /// month, year or custom
    #[arg(short, long, default_value = "month")]
    period: AnalyticsPeriod,

    /// Start of a custom period (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of a custom period (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Reference date instead of the local current date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Session token
    #[arg(long, env = "DASHBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Configuration file
    #[arg(short, long, default_value = "dashboard.yaml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DashboardConfig::load(&cli.config)?;
    init_logging(&config.log_filter);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let account = cli.account.clone().unwrap_or_else(|| config.account_name.clone());

    let mut state = AnalyticsState::new();
    state.select_period_with_bounds(cli.period, cli.from, cli.to, today)?;

    let storage = Arc::new(JsonHistoryRepository::new(&cli.history));
    let service = AnalyticsService::new(storage, config.geometry_service());
    let ctx = SessionContext::new(cli.token.clone());

    let query = AnalyticsQuery::for_period(
        account,
        state.selected_period,
        today,
        state.committed_range(),
    );
    info!("🚀 Charting {:?}", query);

    let ticket = state.begin_request();
    let AnalyticsSnapshot { chart, geometry } = service.load_chart(&ctx, &query);
    state.accept_response(ticket, chart, geometry);

    let snapshot = AnalyticsSnapshot {
        chart: state.chart_data.clone(),
        geometry: state
            .geometry
            .clone()
            .context("Chart geometry missing after load")?,
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if !snapshot.chart.has_data() {
        warn!("No transactions for the selected period");
    }
    Ok(())
}
