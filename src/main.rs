//! Presence Relay server
//!
//! Main entry point that wires all crates together, keeps the Discord
//! gateway connection alive, and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

use presence_api::AppState;
use presence_cache::ActivityCache;
use presence_core::config::AppConfig;
use presence_core::error::AppError;
use presence_core::traits::SystemClock;
use presence_gateway::{ConnectionState, GatewayClient, GatewayState, HandlerRegistry, LoggingHandler};

/// Command-line flags. Anything not given here comes from configuration.
#[derive(Debug, Parser)]
#[command(name = "presence-server", version, about = "Discord rich presence relay")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(long)]
    port: Option<u16>,

    /// Development mode (debug logging)
    #[arg(long, alias = "reload")]
    dev: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config, cli.dev);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment, then apply CLI flags.
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let env = std::env::var("PRESENCE_ENV").unwrap_or_else(|_| "development".to_string());

    let mut config = AppConfig::load(&env)?;

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig, dev: bool) {
    let filter = if dev {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Presence Relay v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Gateway state and event handlers ─────────────────
    let gateway_state = Arc::new(GatewayState::new());
    let handlers = Arc::new(HandlerRegistry::new());
    handlers.register(Arc::new(LoggingHandler)).await;

    // ── Step 2: Activity cache ───────────────────────────────────
    let ttl = config.cache.ttl()?;
    let connection: Arc<dyn ConnectionState> = gateway_state.clone();
    let activity_cache = Arc::new(ActivityCache::new(
        Arc::clone(&connection),
        Arc::new(SystemClock),
        config.discord.channel_id,
        ttl,
    ));
    tracing::info!(
        ttl_ms = ttl.num_milliseconds(),
        channel_id = ?config.discord.channel_id,
        "Activity cache initialized"
    );

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Start Discord client ─────────────────────────────
    let gateway_handle = start_discord_client(
        &config,
        Arc::clone(&gateway_state),
        Arc::clone(&handlers),
        shutdown_rx,
    );

    // ── Step 5: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tracing::info!("Starting HTTP server on {}...", addr);

    let app_state = AppState::new(Arc::new(config), connection, activity_cache);
    let app = presence_api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Presence Relay listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 7: Wait for the gateway connection to close ─────────
    if let Some(handle) = gateway_handle {
        tracing::info!("Waiting for Discord client to close...");
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Discord client did not close within {:?}", grace);
        }
    }

    tracing::info!("Presence Relay shut down gracefully");
    Ok(())
}

/// Spawn the gateway client. Returns `None` when it cannot start, in which
/// case the HTTP API keeps running and reports the client as offline.
fn start_discord_client(
    config: &AppConfig,
    state: Arc<GatewayState>,
    handlers: Arc<HandlerRegistry>,
    shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    tracing::info!("Starting Discord client...");

    let proxy = match config.proxy.settings() {
        Ok(proxy) => proxy,
        Err(e) => {
            tracing::error!(error = %e, "Invalid proxy configuration, Discord client not started");
            return None;
        }
    };
    if let Some(proxy) = &proxy {
        tracing::info!(proxy = %proxy.authority(), "Proxy enabled");
        if proxy.auth.is_some() {
            tracing::info!("Proxy authentication enabled");
        }
    }

    let credentials = match config.discord.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "Discord client not started, running offline");
            return None;
        }
    };
    tracing::info!(
        token = %credentials.token_prefix(),
        channel_id = %credentials.channel_id,
        "Discord credentials loaded"
    );

    let client = GatewayClient::new(credentials, config.discord.clone(), proxy, state, handlers);

    Some(tokio::spawn(async move {
        if let Err(e) = client.run(shutdown).await {
            let e = AppError::from(e);
            tracing::error!(kind = %e.kind, error = %e, source = ?e.source, "Discord client stopped");
        }
    }))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
