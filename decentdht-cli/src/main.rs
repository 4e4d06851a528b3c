use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use decentdht_core::config::BindingConfig;
use decentdht_core::logging::init_logging_with_config;
use decentdht_core::metrics::init_metrics;
use decentdht_core::{
    client_from_config, BindingKind, Config, Db, FieldValue, MemoryTransport, Operation, Record,
    Status, TicketConfig,
};
use serde::Serialize;
use tracing::{debug, info, warn};

const TABLE: &str = "usertable";

#[derive(Parser, Debug)]
#[command(name = "decentdht")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Load configuration from a TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective configuration as TOML
    Config,

    /// Run insert/read/update/read/delete per record against an in-memory DHT
    Smoke {
        /// Binding variant (direct, ticketed)
        #[arg(short, long)]
        binding: Option<BindingKind>,

        /// Records per worker
        #[arg(short, long, default_value_t = 100)]
        records: usize,

        /// Concurrent workers, one adapter each
        #[arg(short, long, default_value_t = 4)]
        workers: usize,

        /// Operations per ticket (-1 = unbounded)
        #[arg(long, allow_hyphen_values = true)]
        max_ops_per_ticket: Option<TicketConfig>,
    },
}

/// Status counts per operation for one or more workers
#[derive(Debug, Default, Serialize)]
struct Tally {
    operations: BTreeMap<&'static str, BTreeMap<&'static str, u64>>,
    /// Reads after an update that did not return the updated fields
    stale_reads: u64,
}

impl Tally {
    fn record(&mut self, op: Operation, status: &Status) {
        *self.operations.entry(op.as_str()).or_default().entry(status.label()).or_insert(0) += 1;
    }

    fn merge(&mut self, other: Tally) {
        for (op, statuses) in other.operations {
            let entry = self.operations.entry(op).or_default();
            for (label, count) in statuses {
                *entry.entry(label).or_insert(0) += count;
            }
        }
        self.stale_reads += other.stale_reads;
    }

    fn errors(&self) -> u64 {
        self.operations.values().filter_map(|statuses| statuses.get("error")).sum()
    }
}

#[derive(Debug, Serialize)]
struct SmokeSummary {
    binding: BindingKind,
    max_ops_per_ticket: TicketConfig,
    workers: usize,
    records_per_worker: usize,
    tickets_issued: u64,
    open_connections: usize,
    stored_keys: usize,
    #[serde(flatten)]
    tally: Tally,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    init_logging_with_config(config.logging.to_log_config()?)?;
    init_metrics();

    info!(binding = %config.binding.kind, "DecentDHT CLI started");

    match args.command {
        Some(Command::Config) => {
            print!("{}", config.to_toml_string()?);
        }
        Some(Command::Smoke { binding, records, workers, max_ops_per_ticket }) => {
            let mut binding_config = config.binding.clone();
            if let Some(kind) = binding {
                binding_config.kind = kind;
            }
            if let Some(max_ops) = max_ops_per_ticket {
                binding_config.max_ops_per_ticket = max_ops;
            }

            let summary = run_smoke(binding_config, records, workers).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            let errors = summary.tally.errors();
            if errors > 0 || summary.tally.stale_reads > 0 {
                bail!(
                    "Smoke run failed: {} error statuses, {} stale reads",
                    errors,
                    summary.tally.stale_reads
                );
            }
        }
        None => {
            info!("No command specified. Use --help for usage information.");
        }
    }

    info!("DecentDHT CLI finished");

    Ok(())
}

/// File (when given), then environment, then command line flags
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    config
        .apply_lookup(|name| env::var(name).ok())
        .context("Invalid configuration in environment")?;

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config.validate()?;
    Ok(config)
}

async fn run_smoke(binding: BindingConfig, records: usize, workers: usize) -> Result<SmokeSummary> {
    ensure!(workers > 0, "Smoke run needs at least one worker");
    let transport = MemoryTransport::new();

    info!(binding = %binding.kind, records, workers, "Starting smoke run");

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let binding = binding.clone();
            let transport = transport.clone();
            tokio::task::spawn_blocking(move || run_worker(worker, &binding, transport, records))
        })
        .collect();

    let mut tally = Tally::default();
    for handle in handles {
        tally.merge(handle.await.context("Smoke worker panicked")??);
    }

    Ok(SmokeSummary {
        binding: binding.kind,
        max_ops_per_ticket: binding.max_ops_per_ticket,
        workers,
        records_per_worker: records,
        tickets_issued: transport.tickets_issued(),
        open_connections: transport.connections(),
        stored_keys: transport.len()?,
        tally,
    })
}

fn run_worker(
    worker: usize,
    binding: &BindingConfig,
    transport: MemoryTransport,
    records: usize,
) -> Result<Tally> {
    let mut client: Box<dyn Db + Send> = client_from_config(binding, transport);
    client.init().with_context(|| format!("Worker {} failed to initialize", worker))?;

    let mut tally = Tally::default();
    for i in 0..records {
        let key = format!("user{}-{}", worker, i);

        tally.record(Operation::Insert, &client.insert(TABLE, &key, &sample_record(i, "initial")));

        let mut fields = Record::new();
        tally.record(Operation::Read, &client.read(TABLE, &key, None, &mut fields));

        let updated = sample_record(i, "updated");
        tally.record(Operation::Update, &client.update(TABLE, &key, &updated));

        fields.clear();
        let status = client.read(TABLE, &key, None, &mut fields);
        if status.is_ok() && fields != updated {
            warn!(key = %key, "read after update returned stale fields");
            tally.stale_reads += 1;
        }
        tally.record(Operation::Read, &status);

        tally.record(Operation::Delete, &client.delete(TABLE, &key));
    }

    let mut rows = Vec::new();
    tally.record(Operation::Scan, &client.scan(TABLE, "user", records, None, &mut rows));

    client.cleanup().with_context(|| format!("Worker {} failed to clean up", worker))?;
    debug!(worker, "Smoke worker finished");

    Ok(tally)
}

fn sample_record(index: usize, phase: &str) -> Record {
    (0..3)
        .map(|field| {
            (format!("field{}", field), FieldValue::from(format!("{}-{}-{}", phase, index, field)))
        })
        .collect()
}
