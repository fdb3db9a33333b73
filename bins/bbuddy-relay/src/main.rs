//! Barcode Buddy relay binary
//!
//! Loads configuration from the environment (seeded from an env file),
//! validates it, and serves the scanner page plus the forwarding endpoints
//! until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use axum::Router;
use cli::{Cli, Commands, EnvFileArgs, StartArgs};
use config::{load_config, load_env_file, validate_config, RelayConfig, ValidationReport};
use observability::{init_logging, init_metrics, LogFormat};
use relay::{relay_routes, Forwarder, RelayState};
use server::{health_routes, validate_port_available, HealthState, HttpServer, ServerConfig, ServerExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "bbuddy-relay";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let format = LogFormat::parse(cli.log_format.as_str()).unwrap_or_default();
    init_logging(SERVICE_NAME, format)?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command() {
        Commands::Start(args) => {
            info!("Executing 'start' command");
            start_relay(args).await
        }
        Commands::Validate(args) => {
            info!("Executing 'validate' command");
            validate_command(&args)
        }
    }
}

/// Seed the environment from the env file, then read it
fn load(env: &EnvFileArgs) -> Result<RelayConfig> {
    match env.path() {
        Some(path) => {
            load_env_file(path)?;
        }
        None => debug!("Env file loading disabled"),
    }

    load_config()
}

fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    for err in &report.errors {
        error!("{}", err);
    }
}

/// Relay routes plus `/health`
fn build_router(config: &RelayConfig) -> Result<Router> {
    let forwarder = Forwarder::new(&config.upstream).context("Failed to create upstream client")?;
    if !forwarder.is_configured() {
        warn!("Upstream not configured; forwarding endpoints will answer 500");
    }

    let health = Arc::new(HealthState::new(SERVICE_NAME, env!("CARGO_PKG_VERSION")));
    Ok(relay_routes(Arc::new(RelayState::new(forwarder))).merge(health_routes(health)))
}

async fn start_relay(args: StartArgs) -> Result<()> {
    let mut config = load(&args.env)?;
    if let Some(host) = args.host {
        config = config.with_bind_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    let report = validate_config(&config);
    log_report(&report);
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        anyhow::bail!("Cannot start relay due to configuration errors");
    }

    if let Some(port) = args.metrics_port {
        init_metrics(port)?;
    }

    let router = build_router(&config)?;
    let server_config = ServerConfig::new(config.listen.host.clone(), config.listen.port);
    validate_port_available(&server_config).await?;

    info!(
        host = %config.listen.host,
        port = config.listen.port,
        upstream = ?config.upstream.host,
        scheme = %config.upstream.scheme,
        "Starting relay"
    );

    HttpServer::new(server_config, router)
        .run_with_signals()
        .await?;

    info!("Relay stopped");
    Ok(())
}

fn validate_command(args: &EnvFileArgs) -> Result<()> {
    let config = match load(args) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            return Err(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Listen: {}:{}", config.listen.host, config.listen.port);
    match config.upstream.target() {
        Some(target) => println!("Upstream: {}", target.base_url),
        None => println!("Upstream: not configured"),
    }
    match config.upstream.timeout() {
        Some(timeout) => println!("Timeout: {}s", timeout.as_secs()),
        None => println!("Timeout: disabled"),
    }

    Ok(())
}
