use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use filetrack_analytics::{hot_locations, AnalyticsReport, GridProjection};
use filetrack_location::{codec, Cluster, FileRecord, RecordDraft, RecordId, RecordPatch};
use filetrack_registry::{HttpStore, Registry};
use filetrack_search::{RecordFilter, SearchIndex, SearchMode};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::FiletrackConfig;

mod config;
mod report;

#[derive(Parser)]
#[command(name = "filetrack")]
#[command(about = "Track where physical documents are stored", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./filetrack.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record service base URL (overrides config and FILETRACK_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, optionally filtered
    List(ListArgs),

    /// Find the first record matching a file id or slot token
    Search {
        query: String,

        #[arg(long, value_enum, default_value_t = SearchBy::FileId)]
        by: SearchBy,
    },

    /// Show storage analytics
    Stats,

    /// Show the most used slots
    Hot {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the occupancy grid, optionally for one cluster
    Grid {
        #[arg(long)]
        cluster: Option<String>,
    },

    /// Register a new document
    Add(AddArgs),

    /// Change some fields of an existing record
    Update(UpdateArgs),

    /// Delete one or more records by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Decode a slot token without contacting the service
    Locate { token: String },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    cluster: Option<String>,

    #[arg(long)]
    row: Option<u8>,

    #[arg(long)]
    column: Option<u8>,

    #[arg(long)]
    file_id: Option<String>,

    /// Substring matched against file id, slot and address
    #[arg(long)]
    term: Option<String>,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    file_id: String,

    #[arg(long)]
    cluster: String,

    #[arg(long, allow_hyphen_values = true)]
    row: i64,

    #[arg(long, allow_hyphen_values = true)]
    column: i64,

    #[arg(long)]
    address: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    id: String,

    #[arg(long)]
    file_id: Option<String>,

    #[arg(long)]
    cluster: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    row: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    column: Option<i64>,

    /// New note; pass an empty string to clear it
    #[arg(long)]
    address: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SearchBy {
    FileId,
    Location,
}

impl SearchBy {
    fn as_domain(self) -> SearchMode {
        match self {
            Self::FileId => SearchMode::FileId,
            Self::Location => SearchMode::Location,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let json = cli.json;
    match cli.command {
        Commands::Locate { token } => locate(&token, json),
        command => {
            let config = FiletrackConfig::resolve(cli.config.as_deref(), cli.backend_url.as_deref())?;
            run(command, &config, json).await
        }
    }
}

async fn run(command: Commands, config: &FiletrackConfig, json: bool) -> Result<()> {
    let store = HttpStore::new(&config.registry).context("Failed to build HTTP client")?;
    log::debug!("Using record service at {}", store.base_url());
    let registry = Registry::new(Arc::new(store));

    match command {
        Commands::List(args) => {
            let filter = build_filter(&args)?;
            let records = registry.load().await?;
            let matched = filter.apply(&records);
            if json {
                print_json(&matched)?;
            } else {
                print!("{}", report::render_records(&matched));
            }
        }
        Commands::Search { query, by } => {
            let records = registry.load().await?;
            let Some(record) = SearchIndex::search(&records, &query, by.as_domain()) else {
                eprintln!("No file found for {} '{}'", by.as_domain(), query.trim());
                std::process::exit(1);
            };
            print_record(record, json)?;
        }
        Commands::Stats => {
            let records = registry.load().await?;
            let analytics = AnalyticsReport::build(&records, &config.analytics);
            if json {
                print_json(&analytics)?;
            } else {
                print!("{}", report::render_report(&analytics));
            }
        }
        Commands::Hot { limit } => {
            let limit = limit.unwrap_or(config.analytics.hot_location_limit);
            let records = registry.load().await?;
            let hot = hot_locations(&records, limit);
            if json {
                print_json(&hot)?;
            } else {
                print!("{}", report::render_hot_locations(&hot));
            }
        }
        Commands::Grid { cluster } => {
            let cluster = cluster.as_deref().map(parse_cluster).transpose()?;
            let records = registry.load().await?;
            let view = GridProjection::build(&records, cluster);
            if json {
                print_json(&serde_json::json!({
                    "cluster": view.cluster,
                    "dimensions": view.dimensions,
                    "totalRecords": view.total_records,
                    "occupancy": view.occupancy(),
                }))?;
            } else {
                print!("{}", report::render_grid(&view));
            }
        }
        Commands::Add(args) => {
            let mut draft = RecordDraft::new(args.file_id, args.cluster, args.row, args.column);
            if let Some(address) = args.address {
                draft = draft.address(address);
            }
            let record = registry.create(&draft).await?;
            print_record(&record, json)?;
        }
        Commands::Update(args) => {
            let id = RecordId::new(args.id);
            let patch = RecordPatch {
                file_id: args.file_id,
                cluster: args.cluster,
                row: args.row,
                column: args.column,
                address: args.address,
            };
            // Reject bad input before touching the network
            let update = patch.validate()?;
            if update.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field");
            }

            registry.load().await?;
            registry.update(&id, &patch).await?;
            let record = registry
                .get(&id)
                .await
                .with_context(|| format!("Record {id} vanished after update"))?;
            print_record(&record, json)?;
        }
        Commands::Delete { ids } => {
            let ids: Vec<RecordId> = ids.into_iter().map(RecordId::from).collect();
            let outcome = registry.bulk_delete(&ids).await;
            if json {
                print_json(&outcome)?;
            } else {
                print!("{}", report::render_bulk_delete(&outcome));
            }
            if !outcome.is_complete() {
                std::process::exit(1);
            }
        }
        Commands::Locate { token } => locate(&token, json)?,
    }

    Ok(())
}

fn locate(token: &str, json: bool) -> Result<()> {
    let token = token.trim();
    let decoded = codec::decode(token)?;
    if json {
        print_json(&serde_json::json!({
            "token": codec::encode(decoded.cluster, decoded.row, decoded.column),
            "cluster": decoded.cluster,
            "clusterName": decoded.cluster.name(),
            "row": decoded.row,
            "column": decoded.column,
        }))
    } else {
        print!("{}", report::render_token(token, &decoded));
        Ok(())
    }
}

fn build_filter(args: &ListArgs) -> Result<RecordFilter> {
    let mut filter = RecordFilter::new();
    if let Some(cluster) = args.cluster.as_deref() {
        filter = filter.cluster(parse_cluster(cluster)?);
    }
    if let Some(row) = args.row {
        filter = filter.row(row);
    }
    if let Some(column) = args.column {
        filter = filter.column(column);
    }
    if let Some(file_id) = &args.file_id {
        filter = filter.file_id(file_id.as_str());
    }
    if let Some(term) = &args.term {
        filter = filter.term(term.as_str());
    }
    Ok(filter)
}

fn parse_cluster(raw: &str) -> Result<Cluster> {
    raw.parse::<Cluster>().map_err(anyhow::Error::msg)
}

fn print_record(record: &FileRecord, json: bool) -> Result<()> {
    if json {
        print_json(record)
    } else {
        print!("{}", report::render_record(record));
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
