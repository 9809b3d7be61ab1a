// Network Config - Main Entry Point
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network Config
//!
//! Command-line front end: loads a network snapshot, runs an edit session
//! against the network service and prints the resulting state.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use network_config::models::{ManagedProperties, NetworkType};
use network_config::services::{DbusNetworkService, MemoryNetworkService, NetworkService};
use network_config::storage::{read_json, SettingsStore};
use network_config::{ConfigSession, Result, SessionOptions, APP_NAME, VERSION};

/// Parsed command-line options.
#[derive(Debug, Default)]
struct Options {
    snapshot: Option<PathBuf>,
    certs: Option<PathBuf>,
    guid: Option<String>,
    network_type: Option<NetworkType>,
    share: Option<bool>,
    offline: bool,
    save: bool,
    connect: bool,
    debug: bool,
}

/// Print version information and exit.
fn print_version() {
    println!("{} {}", APP_NAME, VERSION);
    println!("Copyright (C) 2026 Christos A. Daggas");
    println!("License: MIT");
}

/// Print help information and exit.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS] [SNAPSHOT.json]",
        env::args().next().unwrap_or_else(|| "network-config".to_string())
    );
    println!();
    println!("Edit a network configuration and print the result.");
    println!();
    println!("Options:");
    println!("  -h, --help          Show this help message and exit");
    println!("  -v, --version       Show version information and exit");
    println!("  -d, --debug         Enable debug logging");
    println!("  -t, --type TYPE     Type of a new network (WiFi, Ethernet, WiMAX, VPN)");
    println!("  -g, --guid ID       Edit the existing network ID");
    println!("  -c, --certs FILE    Certificate lists (JSON) for offline mode");
    println!("      --offline       Use an in-memory network service");
    println!("      --share         Share a new network with all users");
    println!("      --no-share      Do not share a new network");
    println!("      --save          Save the configuration");
    println!("      --connect       Save and connect");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG            Set log level (trace, debug, info, warn, error)");
}

enum Parsed {
    Run(Options),
    Exit(ExitCode),
}

fn parse_args(args: &[String]) -> Parsed {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return Parsed::Exit(ExitCode::SUCCESS);
            }
            "-v" | "--version" => {
                print_version();
                return Parsed::Exit(ExitCode::SUCCESS);
            }
            "-d" | "--debug" => options.debug = true,
            "--offline" => options.offline = true,
            "--share" => options.share = Some(true),
            "--no-share" => options.share = Some(false),
            "--save" => options.save = true,
            "--connect" => options.connect = true,
            "-g" | "--guid" | "-c" | "--certs" | "-t" | "--type" => {
                let Some(value) = iter.next() else {
                    eprintln!("Option {} requires a value", arg);
                    return Parsed::Exit(ExitCode::FAILURE);
                };
                match arg.as_str() {
                    "-g" | "--guid" => options.guid = Some(value.clone()),
                    "-c" | "--certs" => options.certs = Some(PathBuf::from(value)),
                    _ => match serde_json::from_value(serde_json::Value::String(value.clone())) {
                        Ok(network_type) => options.network_type = Some(network_type),
                        Err(_) => {
                            eprintln!("Unknown network type: {}", value);
                            return Parsed::Exit(ExitCode::FAILURE);
                        }
                    },
                }
            }
            _ => {
                if arg.starts_with('-') {
                    eprintln!("Unknown option: {}", arg);
                    eprintln!("Try '--help' for more information.");
                    return Parsed::Exit(ExitCode::FAILURE);
                }
                options.snapshot = Some(PathBuf::from(arg));
            }
        }
    }
    Parsed::Run(options)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Parsed::Run(options) => options,
        Parsed::Exit(code) => return code,
    };

    let store = SettingsStore::new();
    let settings = store.settings();

    // Initialize logging with appropriate level
    let log_level = if options.debug {
        tracing::Level::DEBUG
    } else {
        settings.log_level.parse().unwrap_or(tracing::Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(options, SessionOptions::from_config(&settings), &settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    options: Options,
    session_options: SessionOptions,
    settings: &network_config::models::AppConfig,
) -> Result<()> {
    let mut snapshot = match &options.snapshot {
        Some(path) => read_json::<ManagedProperties>(path)?,
        None => ManagedProperties::new_network(options.network_type.unwrap_or(NetworkType::WiFi)),
    };
    if let Some(guid) = &options.guid {
        snapshot.guid = Some(guid.clone());
    }

    let service: Arc<dyn NetworkService> = if options.offline {
        let mut memory = MemoryNetworkService::new();
        if snapshot.guid().is_some() {
            memory = memory.with_network(snapshot.clone());
        }
        if let Some(path) = &options.certs {
            memory = memory.with_certificates(read_json(path)?);
        }
        Arc::new(memory)
    } else {
        Arc::new(DbusNetworkService::connect(settings).await?)
    };

    let mut session = ConfigSession::new(service, session_options, snapshot);
    session.init().await?;
    if let Some(share) = options.share {
        session.set_share_network(share)?;
    }

    print_state(&session)?;

    if options.save || options.connect {
        let outcome = session.save_and_connect(options.connect).await?;
        println!("outcome: {:?}", outcome);
    }
    Ok(())
}

fn print_state(session: &ConfigSession) -> Result<()> {
    println!("isConfigured: {}", session.is_configured());
    println!("enableSave: {}", session.enable_save());
    println!("enableConnect: {}", session.enable_connect());
    println!("error: {}", session.error());
    let payload = session.payload()?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
