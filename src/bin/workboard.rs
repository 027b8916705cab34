//! workboard CLI: operator interface to the work-order board.

use clap::{Args, Parser, Subcommand};
use secrecy::ExposeSecret;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use workboard::config::Config;
use workboard::db::Db;
use workboard::db::orders::PgOrderSource;
use workboard::poll::{CycleOutcome, PollConfig, Poller};
use workboard::render::{BoardOptions, render_board, render_no_data};
use workboard::source::{JsonFileSource, OrderSource};
use workboard::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "workboard", about = "Maintenance work-order board")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Read work orders from a JSON file (array of objects) instead of Postgres
    #[arg(long)]
    from_json: Option<PathBuf>,
    /// Expand the detail section for this assignee
    #[arg(long)]
    assignee: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the source and redraw the board every cycle
    Watch {
        #[command(flatten)]
        source: SourceArgs,
        /// Override the poll interval (seconds)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Evaluate once and print the board
    Snapshot {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the snapshot as JSON instead of the text board
        #[arg(long)]
        json: bool,
    },
    /// Check database connectivity
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "workboard".to_string(),
        log_level: config.log_level.clone(),
    })?;

    match cli.command {
        Command::Watch { source, interval } => {
            let mut poll = PollConfig::from(&config);
            if let Some(secs) = interval {
                anyhow::ensure!(secs > 0, "--interval must be at least 1 second");
                poll.interval = Duration::from_secs(secs);
            }
            let options = BoardOptions {
                assignee: source.assignee,
            };
            match source.from_json {
                Some(path) => cmd_watch(JsonFileSource::new(path), poll, options).await,
                None => cmd_watch(pg_source(&config, poll.interval)?, poll, options).await,
            }
        }
        Command::Snapshot { source, json } => {
            let poll = PollConfig::from(&config);
            let options = BoardOptions {
                assignee: source.assignee,
            };
            match source.from_json {
                Some(path) => cmd_snapshot(JsonFileSource::new(path), poll, options, json).await,
                None => {
                    let source = pg_source(&config, poll.interval)?;
                    cmd_snapshot(source, poll, options, json).await
                }
            }
        }
        Command::Check => cmd_check(&config).await,
    }
}

/// Lazily connected, so an unreachable database shows up as a no-data
/// cycle instead of stopping the board. A fetch gives up within one interval.
fn pg_source(config: &Config, acquire_timeout: Duration) -> anyhow::Result<PgOrderSource> {
    let url = config.require_database_url()?;
    let db = Db::connect_lazy(url.expose_secret(), acquire_timeout)?;
    Ok(PgOrderSource::new(db, config.work_group))
}

async fn cmd_watch<S: OrderSource + 'static>(
    source: S,
    poll: PollConfig,
    options: BoardOptions,
) -> anyhow::Result<()> {
    let poller = Poller::new(Arc::new(source), poll);

    let stopper = poller.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        stopper.shutdown();
    });

    poller
        .run(|outcome| {
            let board = match outcome {
                CycleOutcome::Ready(snapshot) => render_board(snapshot, &options),
                CycleOutcome::NoData { at, reason } => render_no_data(*at, reason),
            };
            // Clear the screen and home the cursor before each redraw.
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "\x1b[2J\x1b[H{board}");
            let _ = stdout.flush();
        })
        .await;

    Ok(())
}

async fn cmd_snapshot<S: OrderSource>(
    source: S,
    poll: PollConfig,
    options: BoardOptions,
    json: bool,
) -> anyhow::Result<()> {
    let poller = Poller::new(Arc::new(source), poll);

    match poller.run_cycle().await {
        CycleOutcome::Ready(snapshot) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_board(&snapshot, &options));
            }
            Ok(())
        }
        CycleOutcome::NoData { reason, .. } => {
            anyhow::bail!("no data available: {reason}")
        }
    }
}

async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let url = config.require_database_url()?;
    let db = Db::connect(url.expose_secret()).await?;
    db.health_check().await?;
    println!("Database reachable.");
    Ok(())
}
