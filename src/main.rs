//! push-scope
//!
//! Evaluates a change event against a fleet of proxies and prints the
//! resulting push plan.
//!
//! ```text
//!   policy.toml ──▶ config::load_config ──▶ PushPolicy ──▶ PushPlanner
//!                        ▲                                    │
//!                        │ (watch)                            ▼
//!                  ConfigWatcher           event.json + proxies.json ──▶ PushPlan (JSON)
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use push_scope::config::{load_config, ConfigWatcher, ScopeConfig};
use push_scope::observability::{logging, metrics};
use push_scope::{ChangeEvent, ChannelSet, Proxy, ProxyRole, PushPlan, PushPlanner, PushPolicy};

#[derive(Parser)]
#[command(name = "push-scope")]
#[command(version, about = "Decide which proxies need a config push and which channels to resend", long_about = None)]
struct Cli {
    /// Policy file (TOML). Built-in policy when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the push plan for one event
    Plan {
        #[arg(long)]
        event: PathBuf,
        #[arg(long)]
        proxies: PathBuf,
    },
    /// Print the effective per-role channel tables
    Tables {
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Re-plan every time the policy file changes
    Watch {
        #[arg(long)]
        event: PathBuf,
        #[arg(long)]
        proxies: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Sidecar,
    Gateway,
}

impl From<RoleArg> for ProxyRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Sidecar => ProxyRole::Sidecar,
            RoleArg::Gateway => ProxyRole::Gateway,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ScopeConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(config = ?cli.config, "push-scope v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let planner = PushPlanner::new(PushPolicy::from_config(&config.scoping));

    match cli.command {
        Commands::Plan { event, proxies } => {
            let (event, fleet) = read_inputs(&event, &proxies)?;
            print_plan(&planner.plan(&event, &fleet))?;
        }
        Commands::Tables { role } => {
            print_tables(&planner.policy(), role.map(ProxyRole::from))?;
        }
        Commands::Watch { event, proxies } => {
            let path = cli.config.ok_or("watch requires --config")?;
            let (event, fleet) = read_inputs(&event, &proxies)?;

            let (watcher, mut updates) = ConfigWatcher::new(&path);
            let _watcher = watcher.run()?;

            print_plan(&planner.plan(&event, &fleet))?;
            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Some(new_config) => {
                            planner.swap_policy(PushPolicy::from_config(&new_config.scoping));
                            print_plan(&planner.plan(&event, &fleet))?;
                        }
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted, stopping watch");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn read_inputs(event: &Path, proxies: &Path) -> Result<(ChangeEvent, Vec<Proxy>), Box<dyn std::error::Error>> {
    let event: ChangeEvent = serde_json::from_reader(BufReader::new(File::open(event)?))?;
    let fleet: Vec<Proxy> = serde_json::from_reader(BufReader::new(File::open(proxies)?))?;
    tracing::debug!(kinds = event.configs_updated().len(), proxies = fleet.len(), "Inputs loaded");
    Ok((event, fleet))
}

fn print_plan(plan: &PushPlan) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(plan)?);
    Ok(())
}

fn print_tables(policy: &PushPolicy, only: Option<ProxyRole>) -> Result<(), Box<dyn std::error::Error>> {
    let mut out: BTreeMap<&str, BTreeMap<String, ChannelSet>> = BTreeMap::new();
    for role in ProxyRole::ALL {
        if only.is_some_and(|r| r != role) {
            continue;
        }
        let table = policy
            .tables()
            .for_role(role)
            .entries()
            .into_iter()
            .map(|(kind, channels)| (kind.to_string(), channels))
            .collect();
        out.insert(role.as_str(), table);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
