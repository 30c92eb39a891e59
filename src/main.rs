//! CLI entry point for the fleet timeline tool.
//!
//! Builds collision / engine-off timelines from event files or the fleet
//! dashboard API, and reports vehicle condition, insurance risk, and score
//! history with the dashboard's display bands.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use fleet_timeline::api::types::{HistoryQuery, filter_vehicles};
use fleet_timeline::api::{ApiConfig, DashboardApi, RestClient};
use fleet_timeline::events::{Event, parse_events, parse_instant};
use fleet_timeline::fetch::{BasicClient, fetch_bytes};
use fleet_timeline::output::{append_buckets, print_json, print_pretty};
use fleet_timeline::scores::{
    CategoryLevel, ScoreSeries, format_risk, format_score, risk_band, score_band,
    summarize_history,
};
use fleet_timeline::timeline::{
    BarSlot, Canvas, Margins, ReportWindow, Timeline, compute_bar_geometry,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_timeline")]
#[command(about = "Event timelines and score reports for a vehicle fleet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ChartArgs {
    /// Window start (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Window end, inclusive (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 240.0)]
    height: f64,

    /// Margin applied to every side of the canvas
    #[arg(long, default_value_t = 32.0)]
    margin: f64,

    /// CSV file to append bucket rows to
    #[arg(short, long)]
    output: Option<String>,

    /// Log buckets and bar geometry as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a timeline from a JSON event file or URL
    Timeline {
        /// Path to file or URL to fetch
        #[arg(long, value_name = "FILE_OR_URL")]
        source: String,

        /// Vehicle label written to CSV rows
        #[arg(long, default_value = "all")]
        vehicle: String,

        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Build a timeline for one vehicle from the dashboard API
    VehicleTimeline {
        #[arg(long)]
        vehicle: String,

        #[command(flatten)]
        chart: ChartArgs,
    },
    /// List vehicles, optionally filtered by id or model
    Vehicles {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show used-car condition, insurance risk, and daily health scores
    Report {
        #[arg(long)]
        vehicle: String,

        /// Evaluation date (defaults to yesterday, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Summarize per-category score history
    History {
        #[arg(long)]
        vehicle: String,

        /// Number of days back from the latest evaluation
        #[arg(long, default_value_t = 30, conflicts_with_all = ["start", "end"])]
        days: u32,

        /// Range start date (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        /// Range end date (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fleet_timeline.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_timeline.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(tracing::Level::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive(tracing::Level::DEBUG.into()),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Timeline {
            source,
            vehicle,
            chart,
        } => {
            let window = parse_window(&chart)?;
            let bytes = fetcher(&source).await?;
            let events = parse_events(&bytes)?;
            render_timeline(&vehicle, &events, window, &chart)?;
        }
        Commands::VehicleTimeline { vehicle, chart } => {
            let window = parse_window(&chart)?;
            let api = api_client()?;
            let events = api.events(&vehicle, &window).await?;
            render_timeline(&vehicle, &events, window, &chart)?;
        }
        Commands::Vehicles { query } => {
            let api = api_client()?;
            let (vehicles, summary) = tokio::try_join!(api.list_vehicles(), api.vehicle_summary())?;

            let hits = filter_vehicles(&vehicles, &query);
            for v in &hits {
                info!(vehicle_id = %v.vehicle_id, model = %v.model, "Vehicle");
            }
            info!(
                total = summary.total_vehicles,
                listed = vehicles.len(),
                matched = hits.len(),
                "Vehicle list summary"
            );
        }
        Commands::Report { vehicle, date } => {
            let api = api_client()?;
            report(&api, &vehicle, date).await?;
        }
        Commands::History {
            vehicle,
            days,
            start,
            end,
        } => {
            let query = match (start, end) {
                (Some(start), Some(end)) => HistoryQuery::Range { start, end },
                _ => HistoryQuery::LastDays(days),
            };
            let api = api_client()?;
            history(&api, &vehicle, query).await?;
        }
    }

    Ok(())
}

fn api_client() -> Result<RestClient<BasicClient>> {
    let config = ApiConfig::from_env()?;
    debug!(base_url = %config.base_url, timeout_secs = config.timeout.as_secs(), "API config loaded");
    RestClient::from_config(&config)
}

fn parse_window(chart: &ChartArgs) -> Result<ReportWindow> {
    let start = parse_instant(&chart.start).context("invalid --start")?;
    let end = parse_instant(&chart.end).context("invalid --end")?;
    Ok(ReportWindow::new(start, end)?)
}

/// Loads event data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::with_timeout(Duration::from_secs(30))?;
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url).with_context(|| format!("failed to read {url}"))?
    };
    Ok(bytes)
}

#[derive(Serialize)]
struct RenderedTimeline<'a> {
    vehicle_id: &'a str,
    timeline: &'a Timeline,
    canvas: Canvas,
    bars: Vec<BarSlot>,
}

/// Buckets the events, lays out the bar chart, and emits the result.
#[tracing::instrument(skip(events, chart), fields(events = events.len()))]
fn render_timeline(
    vehicle_id: &str,
    events: &[Event],
    window: ReportWindow,
    chart: &ChartArgs,
) -> Result<()> {
    let timeline = Timeline::build(events, window)?;
    let canvas = Canvas {
        width: chart.width,
        height: chart.height,
        margins: Margins::uniform(chart.margin),
    };
    let bars = compute_bar_geometry(&timeline.buckets, &canvas);

    for bucket in timeline.buckets.iter().filter(|b| b.total() > 0) {
        debug!(
            label = %bucket.label,
            collisions = bucket.collision_count,
            engine_offs = bucket.engine_off_count,
            "Bucket"
        );
    }

    info!(
        granularity = ?timeline.granularity,
        buckets = timeline.buckets.len(),
        collisions = timeline.collisions,
        engine_offs = timeline.engine_offs,
        peak = timeline.peak(),
        "Timeline built"
    );

    if chart.json {
        print_json(&RenderedTimeline {
            vehicle_id,
            timeline: &timeline,
            canvas,
            bars,
        })?;
    } else {
        print_pretty(&bars);
    }

    if let Some(path) = &chart.output {
        append_buckets(path, vehicle_id, &timeline.buckets)?;
        info!(path = %path, "Buckets written");
    }

    Ok(())
}

/// Logs detail, used-car, insurance, and daily score for a vehicle.
///
/// Missing used-car, insurance, or score data is reported, not fatal.
#[tracing::instrument(skip(api))]
async fn report<A: DashboardApi>(api: &A, vehicle_id: &str, date: Option<NaiveDate>) -> Result<()> {
    let date = date
        .or_else(|| Utc::now().date_naive().pred_opt())
        .context("no date before today")?;

    let (detail, used_car, insurance, score) = tokio::join!(
        api.vehicle_detail(vehicle_id),
        api.used_car(vehicle_id),
        api.insurance(vehicle_id),
        api.score(vehicle_id, date),
    );
    let detail = detail?;

    info!(
        vehicle_id = %detail.vehicle_id,
        model = %detail.model,
        year = ?detail.year,
        total_distance_km = ?detail.total_distance,
        average_speed_kmh = ?detail.average_speed,
        fuel_efficiency_kml = ?detail.fuel_efficiency,
        collision_events = detail.collision_events.as_deref().unwrap_or("-"),
        "Vehicle detail"
    );

    match used_car {
        Ok(report) => {
            for (name, score) in report.labelled_scores() {
                let band = score_band(score);
                info!(category = name, score = %format_score(score), band = ?band, color = band.color(), "Used-car score");
            }
            let overall = score_band(report.overall_grade);
            info!(score = %format_score(report.overall_grade), band = ?overall, "Used-car overall");
        }
        Err(e) => warn!(error = %e, "No used-car evaluation data"),
    }

    match insurance {
        Ok(report) => {
            for (name, risk) in report.labelled_risks() {
                let band = risk_band(risk);
                info!(category = name, risk = %format_risk(risk), band = ?band, color = band.color(), "Insurance risk");
            }
            let overall = risk_band(report.overall_grade);
            info!(risk = %format_risk(report.overall_grade), band = ?overall, "Insurance overall");
        }
        Err(e) => warn!(error = %e, "No insurance risk data"),
    }

    match score {
        Ok(data) => {
            info!(date = %data.analysis_date, final_score = data.scores.final_score, "Health evaluation");
            for (name, value) in data.scores.categories() {
                let level = CategoryLevel::from_score(value);
                info!(category = name, score = value, level = ?level, color = level.color(), "Category score");
            }
            print_pretty(&data.metrics);
        }
        Err(e) => warn!(date = %date, error = %e, "No score data for date"),
    }

    Ok(())
}

#[tracing::instrument(skip(api))]
async fn history<A: DashboardApi>(api: &A, vehicle_id: &str, query: HistoryQuery) -> Result<()> {
    let resp = api.score_history(vehicle_id, query).await?;

    if resp.records.is_empty() {
        warn!("No score history for the selected period");
        return Ok(());
    }

    info!(
        start = ?resp.start_date,
        end = ?resp.end_date,
        records = resp.records.len(),
        "Score history loaded"
    );

    for series in ScoreSeries::ALL {
        let summary = summarize_history(&resp.records, series);
        info!(
            series = series.key(),
            label = series.label(),
            samples = summary.samples,
            mean = summary.mean,
            stddev = summary.stddev,
            min = ?summary.min,
            max = ?summary.max,
            level = ?summary.level,
            "Series summary"
        );
    }

    Ok(())
}
