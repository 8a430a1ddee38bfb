//! Process wiring: config → session store → backend → bootstrap → janitor →
//! HTTP gateway → signal wait → disconnect.

use std::{path::PathBuf, sync::Arc};

use {
    clap::Parser,
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    wasend_channels::{MessagingBackend, NoopBackend, SessionStore, SledSessionStore},
    wasend_dispatch::Dispatcher,
    wasend_gateway::{GatewayState, auth::ResolvedAuth, server::start_gateway},
    wasend_media::{StagingStore, janitor::run_janitor},
    wasend_session::Bootstrapper,
};

#[derive(Parser)]
#[command(name = "wasend", about = "wasend — outbound messaging gateway")]
struct Cli {
    /// Bind address for the HTTP gateway (overrides config).
    #[arg(long)]
    bind: Option<String>,

    /// Port for the HTTP gateway (overrides config).
    #[arg(long)]
    port: Option<u16>,

    /// Directory to search for wasend.{toml,yaml,yml,json}.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "wasend starting");

    if let Some(dir) = &cli.config_dir {
        wasend_config::loader::set_config_dir(dir.clone());
    }
    let config = wasend_config::discover_and_load();

    let Some(token) = config.auth.resolve_token() else {
        anyhow::bail!("no auth token configured; set auth.token in the config file or WASEND_TOKEN");
    };

    let store: Arc<dyn SessionStore> =
        Arc::new(SledSessionStore::open(&config.session.store_path)?);
    let backend: Arc<dyn MessagingBackend> = Arc::new(NoopBackend::new(Arc::clone(&store)));

    // Bootstrap must finish before the gateway accepts a single call.
    let bootstrapper = Bootstrapper::new(Arc::clone(&store), Arc::clone(&backend));
    if let Err(e) = bootstrapper.bootstrap().await {
        error!(error = %e, "session bootstrap failed; operator intervention required");
        return Err(e.into());
    }

    let staging = Arc::new(StagingStore::open(config.staging.dir.clone()).await?);
    tokio::spawn(run_janitor(
        Arc::clone(&staging),
        config.staging.sweep_interval(),
        config.staging.max_age(),
    ));

    let dispatcher = Dispatcher::new(Arc::clone(&backend));
    let state = GatewayState::new(ResolvedAuth { token }, dispatcher, staging);

    let bind = cli.bind.unwrap_or(config.gateway.bind);
    let port = cli.port.unwrap_or(config.gateway.port);
    let server = tokio::spawn(async move {
        if let Err(e) = start_gateway(state, &bind, port).await {
            error!(error = %e, "gateway server exited");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, disconnecting");
    backend.disconnect().await;
    server.abort();
    Ok(())
}
