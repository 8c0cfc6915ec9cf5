//! tops-ingest CLI
//!
//! One invocation runs one ingestion cycle (or a read-side command); the
//! re-run cadence is left to cron or a systemd timer.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tops_ingest::{
    analytics,
    error::Result,
    feed::FeedClient,
    models::{Config, parse_event_time},
    pipeline::run_ingest,
    storage::{IncidentStore, SqliteStore},
};

/// tops-ingest - Tallahassee Police active-incident feed ingester
#[derive(Parser, Debug)]
#[command(
    name = "tops-ingest",
    version,
    about = "Ingests Tallahassee Police active-incident feed data into a local store"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one ingestion cycle: fetch, deduplicate, persist
    Ingest,

    /// List stored incidents
    List {
        /// Maximum number of incidents to print
        #[arg(long)]
        limit: Option<usize>,

        /// Sort newest event first (by parsed event time)
        #[arg(long)]
        sort_by_time: bool,
    },

    /// Print aggregate statistics over stored history
    Stats {
        /// Restrict to incidents from the last 24 hours
        #[arg(long)]
        recent: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show store and feed summary
    Info,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Pick the log level before swallowing config load errors, so a fallback
    // to defaults is still visible in the log.
    let loaded = Config::load(&cli.config);
    let level = match (cli.verbose, &loaded) {
        (true, _) => "debug".to_string(),
        (false, Ok(config)) => config.logging.level.clone(),
        (false, Err(_)) => "info".to_string(),
    };
    init_logging(&level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    match cli.command {
        Command::Ingest => {
            config.validate()?;

            let feed = FeedClient::new(&config.feed)?;
            let store = open_store(&config).await?;

            log::info!("Fetching incidents from {}", feed.url());
            let report = run_ingest(&feed, &store).await?;

            println!("{}", report.summary());
        }

        Command::List {
            limit,
            sort_by_time,
        } => {
            let store = open_store(&config).await?;
            let mut incidents = store.list_all().await?;

            if sort_by_time {
                // Unparseable or missing event times sort to the end.
                incidents.sort_by_key(|i| {
                    Reverse(i.event_timestamp_raw.as_deref().and_then(parse_event_time))
                });
            }
            if let Some(limit) = limit {
                incidents.truncate(limit);
            }

            for incident in &incidents {
                println!("{}", incident.format("{id}  {date}  {desc}  {address}"));
            }
            log::info!("Listed {} incident(s)", incidents.len());
        }

        Command::Stats { recent } => {
            let store = open_store(&config).await?;
            let all = store.list_all().await?;

            let scoped: Vec<_> = if recent {
                let now = chrono::Local::now().naive_local();
                analytics::last_24_hours(&all, now)
                    .into_iter()
                    .cloned()
                    .collect()
            } else {
                all
            };

            println!("Incidents: {}", scoped.len());

            println!("\nMost common event types:");
            for (event_type, count) in analytics::event_type_counts(&scoped) {
                println!("  {:>5}  {}", count, event_type);
            }

            println!("\nBy severity:");
            for (code, count) in analytics::severity_distribution(&scoped) {
                println!("  {:>5}  {}", count, analytics::severity_label(&code));
            }

            println!("\nBy hour of day:");
            for (hour, count) in analytics::hourly_histogram(&scoped).iter().enumerate() {
                if *count > 0 {
                    println!("  {:02}:00  {}", hour, count);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (feed endpoint, timeouts, store path)");
        }

        Command::Info => {
            let db_path = Path::new(&config.store.database_path);
            println!("Feed endpoint: {}", config.feed.url);
            println!("Store path:    {}", config.store.database_path);

            if db_path.exists() {
                let store = open_store(&config).await?;
                println!("Stored rows:   {}", store.count().await?);
            } else {
                println!("Stored rows:   (no database yet)");
            }
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<SqliteStore> {
    SqliteStore::open(&config.store.database_path, config.store.busy_timeout_ms).await
}
