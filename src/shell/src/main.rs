use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use garage_panel::{
    config::AppConfig, http_client::ReqwestTransport, input::USAGE,
    preferences::PreferenceStore, shell::Shell,
};
use log::{debug, error, info};
use rustls::crypto::{CryptoProvider, ring::default_provider};
use std::io::Write;
use tokio::{
    io::BufReader,
    signal::unix::{SignalKind, signal},
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize()?;

    let config = AppConfig::get();
    info!("device: {}", config.device.url);
    debug!("preferences: {:?}", config.paths.preferences_file);

    let transport =
        ReqwestTransport::new(&config.device).context("failed to create device transport")?;
    let preferences = PreferenceStore::new(&config.paths.preferences_file);
    let (mut shell, mut outcomes) =
        Shell::new(transport, preferences, Box::new(std::io::stdout()));

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    println!("{USAGE}");

    tokio::select! {
        result = shell.run(&mut outcomes, BufReader::new(tokio::io::stdin())) => result?,
        _ = tokio::signal::ctrl_c() => debug!("ctrl-c received"),
        _ = sigterm.recv() => debug!("SIGTERM received"),
    }

    info!("shutting down");
    Ok(())
}

fn initialize() -> Result<()> {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    // the page owns stdout
    builder.format(|f, record| writeln!(f, "[{}] {}", record.level(), record.args()));
    builder.target(Target::Stderr).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );

    CryptoProvider::install_default(default_provider())
        .map_err(|_| anyhow::anyhow!("crypto provider already installed"))?;

    Ok(())
}
