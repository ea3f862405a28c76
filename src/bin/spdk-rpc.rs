//! `spdk-rpc` - call SPDK accel RPC methods by name
//!
//! ## Usage
//!
//! ```bash
//! # Enable the mlx5 module with crypto on the default socket
//! spdk-rpc mlx5_scan_accel_module '{"enable_crypto": true}'
//!
//! # Old method names still work and print a deprecation notice
//! spdk-rpc iaa_scan_accel_engine
//!
//! # Talk to a TCP listener
//! spdk-rpc -s 10.0.0.5 -p 5260 accel_get_module_info
//!
//! # List known methods
//! spdk-rpc --list
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use spdk_rpc::config::LoggingConfig;
use spdk_rpc::{logging, rpc, AliasRegistry, Config, JsonRpcClient};

use std::env;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "spdk-rpc")]
#[command(about = "Invoke SPDK accel JSON-RPC methods")]
struct Args {
    /// Method name, canonical or deprecated
    method: Option<String>,

    /// Parameters as a JSON object
    params: Option<String>,

    /// RPC socket path or IP address
    #[arg(short = 's', long)]
    server: Option<String>,

    /// RPC port, for TCP addresses
    #[arg(short, long)]
    port: Option<u16>,

    /// Timeout in seconds, 0 waits forever
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Connection retries
    #[arg(short = 'r', long)]
    conn_retries: Option<u32>,

    /// Config file path (CLI args override config)
    #[arg(short, long)]
    config: Option<String>,

    /// List method names and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path).with_context(|| format!("loading {path}"))?,
        None => Config::load()
            .context("loading rpc.toml, rpc.local.toml and SPDK_RPC_* settings")?,
    };

    // Held until exit so the log file writer flushes
    let _trace_guard = init_tracing(&config.logging);

    if let Some(server) = args.server {
        config.client.address = server;
    }
    if let Some(port) = args.port {
        config.client.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.client.timeout_secs = timeout;
    }
    if let Some(retries) = args.conn_retries {
        config.client.conn_retries = retries;
    }

    let table = rpc::accel_methods(AliasRegistry::from_config(&config.deprecation))?;

    if args.list {
        for name in table.methods() {
            println!("{name}");
        }
        for legacy in table.registry().legacy_names() {
            let canonical = table.registry().canonical_for(legacy).unwrap_or("?");
            println!("{legacy} (deprecated, use {canonical})");
        }
        return Ok(());
    }

    let Some(method) = args.method else {
        bail!("no method given, see --help or --list");
    };
    if !table.contains(&method) {
        bail!("unknown method: {method}");
    }

    let params = match &args.params {
        Some(raw) => serde_json::from_str(raw).context("parameters must be a JSON object")?,
        None => serde_json::Value::Null,
    };

    let client = JsonRpcClient::connect(&config.client)?;
    let response = table.invoke(&client, &method, params)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn init_tracing(logging_config: &LoggingConfig) -> Option<WorkerGuard> {
    // SPDK_RPC_LOG takes precedence over the config file level
    let level = env::var("SPDK_RPC_LOG")
        .ok()
        .unwrap_or_else(|| logging_config.level.clone());
    let json = logging_config.format == "json";

    let file = logging_config.file.as_ref().and_then(|path| {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("ERROR: Unable to open log file '{}': {e}", path.display());
                None
            }
        }
    });
    let (file, guard) = match file {
        Some(f) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(f);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = logging::subscriber(&level, json, std::io::stderr, file);
    let _ = tracing::subscriber::set_global_default(subscriber);
    guard
}
