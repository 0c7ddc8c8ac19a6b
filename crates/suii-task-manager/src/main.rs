use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::{Path, PathBuf};
use suii_protocol::{SymbolDomain, SymbolRegistry, TaskBatchMessage};
use suii_task_manager::{CycleOutcome, Plan, TaskManagerConfig, TaskManagerService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_arg = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file (.yaml, .yml or .toml)");

    let cli = Command::new("suii-task-manager")
        .version(suii_task_manager::VERSION)
        .about("SUII work-cell task manager")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("plan")
                .about("Plan a single batch file and print the ordered tasks")
                .arg(
                    Arg::new("batch")
                        .long("batch")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Batch message (.json, .yaml or .yml)"),
                )
                .arg(config_arg.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Read newline-delimited JSON batch messages from stdin")
                .arg(config_arg),
        )
        .subcommand(Command::new("symbols").about("Print the symbol tables"));

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("plan", sub)) => {
            let config = load_config(sub)?;
            init_tracing(&config)?;

            let batch_path = sub
                .get_one::<PathBuf>("batch")
                .context("missing --batch")?;
            let message = read_batch(batch_path)?;
            let batch_id = message.batch_id;

            let mut service = TaskManagerService::new(&config);
            match service.process_batch(message) {
                Ok(plan) => {
                    if sub.get_flag("json") {
                        println!("{}", serde_json::to_string_pretty(plan)?);
                    } else {
                        print_plan(batch_id, plan, &config);
                    }
                }
                Err(error) => {
                    eprintln!("Batch {batch_id} rejected: {error}");
                    std::process::exit(1);
                }
            }
        }
        Some(("serve", sub)) => {
            let config = load_config(sub)?;
            init_tracing(&config)?;
            serve(config).await?;
        }
        Some(("symbols", _)) => print_symbols(),
        _ => anyhow::bail!("unknown subcommand"),
    }

    Ok(())
}

fn load_config(matches: &ArgMatches) -> Result<TaskManagerConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => Ok(TaskManagerConfig::load(path)?),
        None => Ok(TaskManagerConfig::default()),
    }
}

fn init_tracing(config: &TaskManagerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn read_batch(path: &Path) -> Result<TaskBatchMessage> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );

    let message = if yaml {
        serde_yaml::from_str(&text).with_context(|| format!("invalid batch in {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("invalid batch in {}", path.display()))?
    };
    Ok(message)
}

fn print_plan(batch_id: u64, plan: &Plan, config: &TaskManagerConfig) {
    println!("Plan for batch {batch_id}:");
    for step in plan.steps() {
        println!("  {:>3}. [{:>3}] {}", step.position + 1, step.arrival_index, step.task);
    }
    println!(
        "  Location transitions: {}",
        plan.location_transitions(config.planner.start_location)
    );
}

fn print_symbols() {
    let registry = SymbolRegistry::global();
    for domain in SymbolDomain::ALL {
        println!("{domain}:");
        for entry in registry.entries(domain) {
            println!("  {:>4}  {}", entry.code, entry.label);
        }
    }
}

async fn serve(config: TaskManagerConfig) -> Result<()> {
    let (sink, mut outcomes) = mpsc::channel::<CycleOutcome>(config.queue_capacity.max(1));
    let (handle, service) = TaskManagerService::spawn(&config, sink);

    let printer = tokio::spawn(async move {
        while let Some(outcome) = outcomes.recv().await {
            match outcome {
                CycleOutcome::Released { batch_id, plan } => match serde_json::to_string(&plan) {
                    Ok(json) => println!("{{\"batch_id\":{batch_id},\"plan\":{json}}}"),
                    Err(e) => tracing::error!(batch_id, error = %e, "failed to encode plan"),
                },
                CycleOutcome::Rejected { batch_id, error } => {
                    let line = serde_json::json!({
                        "batch_id": batch_id,
                        "rejected": error.to_string(),
                        "kind": error.kind(),
                    });
                    println!("{line}");
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TaskBatchMessage>(&line) {
            Ok(message) => handle.submit_batch(message).await?,
            Err(e) => tracing::warn!(error = %e, "skipping malformed batch message"),
        }
    }

    handle.shutdown().await?;
    let stats = service.await?;
    printer.await?;

    tracing::info!(
        received = stats.batches_received,
        released = stats.batches_released,
        rejected = stats.batches_rejected,
        "input closed"
    );
    Ok(())
}
