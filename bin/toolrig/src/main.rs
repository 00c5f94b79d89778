use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use toolrig_core::Config;
use toolrig_tools::default_registry;

#[derive(Parser)]
#[command(name = "toolrig")]
#[command(about = "Capability registry and lifecycle adapter for function-calling orchestrators", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: ~/.toolrig/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the function-calling schemas of all registered capabilities
    Schemas,

    /// List registered capability names
    List,

    /// Show the metadata record of one capability
    Info {
        /// Capability name
        name: String,
    },

    /// Drive one capability through a one-shot lifecycle
    /// (create -> execute -> calc_reward -> release)
    Run {
        /// Capability name
        name: String,
        /// JSON parameters (e.g. '{"action":"grasp","target":"cube_1"}')
        params: String,
        /// Adopt an externally coordinated instance id instead of generating one
        #[arg(long)]
        instance: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let registry = default_registry(&config);

    match cli.command {
        Commands::Schemas => {
            let schemas = registry.schemas();
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
        Commands::List => {
            let mut names = registry.names();
            names.sort();
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Info { name } => {
            let entry = registry
                .get(&name)
                .ok_or_else(|| anyhow!("unknown capability: {}", name))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&entry.capability.descriptor().metadata_json())?
            );
        }
        Commands::Run {
            name,
            params,
            instance,
        } => {
            let entry = registry
                .get(&name)
                .ok_or_else(|| anyhow!("unknown capability: {}", name))?;
            let parameters: serde_json::Value =
                serde_json::from_str(&params).context("invalid JSON parameters")?;

            let id = entry.adapter.create(instance).await?;
            let outcome = entry.adapter.execute(&id, parameters).await?;
            let total = entry.adapter.calc_reward(&id).await?;
            entry.adapter.release(&id).await?;

            println!("{}", outcome.response);
            println!(
                "reward: {} (total {}), metrics: {}",
                outcome.reward,
                total,
                serde_json::Value::Object(outcome.metrics)
            );
        }
    }

    Ok(())
}
