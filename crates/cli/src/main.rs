use clap::{Parser, Subcommand};
use datacall_core::config::ConfigValues;
use datacall_core::constants::{ADVISORY_ORG_TYPE, DEFAULT_CHANNEL};
use datacall_core::{Identity, Invocation, Network, Operation};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "datacall")]
#[command(about = "Data-call ledger CLI")]
struct Cli {
    /// Directory holding one ledger snapshot per channel
    #[arg(long, env = "DATACALL_STATE_DIR", default_value = "datacall-state")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the contract answers
    Ping,
    /// List every operation and who may call it
    Operations,
    /// Invoke an operation
    Invoke {
        /// Operation name, for example CreateDataCall
        function: String,
        /// Positional arguments, usually one JSON document
        args: Vec<String>,
        /// Channel to invoke on
        #[arg(long, default_value = DEFAULT_CHANNEL)]
        channel: String,
        /// Caller organisation type
        #[arg(long, env = "DATACALL_ORG_TYPE", default_value = ADVISORY_ORG_TYPE)]
        org_type: String,
        /// Transient entries as key=value
        #[arg(long = "transient", value_parser = parse_transient)]
        transient: Vec<(String, String)>,
    },
}

fn parse_transient(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("datacall=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = Arc::new(ConfigValues::from_env().resolve()?);

    match cli.command {
        Some(Commands::Ping) => {
            let mut network = Network::open(cfg.clone(), &cli.state_dir)?;
            let channel = cfg.default_channel().to_owned();
            let identity = Identity::new().with_org_type(ADVISORY_ORG_TYPE);
            let response = network.invoke(&channel, Invocation::new("Ping", identity))?;
            println!("{}", response.payload_str());
        }
        Some(Commands::Operations) => {
            for op in Operation::ALL {
                match op.allowed_org_types() {
                    Some(allowed) => println!("{} ({})", op, allowed.join(", ")),
                    None => println!("{op}"),
                }
            }
        }
        Some(Commands::Invoke {
            function,
            args,
            channel,
            org_type,
            transient,
        }) => {
            if !cfg.hosts(&channel) {
                return Err(format!("channel '{channel}' is not configured in DATACALL_CHANNELS").into());
            }
            let mut network = Network::open(cfg.clone(), &cli.state_dir)?;
            let mut invocation =
                Invocation::new(function, Identity::new().with_org_type(org_type));
            for arg in args {
                invocation = invocation.arg(arg);
            }
            for (key, value) in transient {
                invocation = invocation.transient(key, value.into_bytes());
            }

            match network.invoke(&channel, invocation) {
                Ok(response) => {
                    if let Some(reason) = response.declined {
                        eprintln!("Declined: {reason}");
                    }
                    if let Some(tx_id) = &response.tx_id {
                        eprintln!("Transaction: {tx_id}");
                    }
                    for event in &response.events {
                        eprintln!("Event: {} {}", event.name, String::from_utf8_lossy(&event.payload));
                    }
                    println!("{}", pretty(&response.payload));
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("Use 'datacall --help' for commands");
        }
    }

    Ok(())
}

/// Pretty-print a JSON payload, or show it as text if it is not JSON.
fn pretty(payload: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(payload)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(payload).into_owned())
}
