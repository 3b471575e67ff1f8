use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use userauth_backend::{auth::SystemClock, config::Settings, routes, AppState};

/// Login service with per-account lockout
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (TOML); `USERAUTH_*` environment variables override it
    #[arg(long, default_value = userauth_backend::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, env = "USERAUTH_BIND_ADDR")]
    bind: Option<SocketAddr>,

    /// JSON file of accounts to create at startup
    #[arg(long)]
    users: Option<PathBuf>,
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(users) = args.users {
        settings.users_file = Some(users);
    }

    init_tracing(&settings);

    let state = Arc::new(AppState::from_settings(settings.clone()).await?);

    let sweeper = state
        .throttle()
        .spawn_sweeper(settings.sweep_interval(), Arc::new(SystemClock));

    let app = routes::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    Ok(())
}
