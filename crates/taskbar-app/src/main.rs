mod bridge;
mod cli;

use std::sync::Arc;

use taskbar_config::TaskbarConfig;
use taskbar_routing::host::noop::NoopChrome;
use taskbar_routing::{Engine, JsonFileStore, MemoryStore, Store, WindowChrome};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use bridge::{Bridge, BridgeHost, CALL_TIMEOUT};

fn open_store(config: &TaskbarConfig, args: &cli::Args) -> Arc<dyn Store> {
    let Some(path) = args.store.clone().or_else(|| config.storage.resolve_path()) else {
        tracing::warn!("No data directory available, state will not persist");
        return Arc::new(MemoryStore::new());
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create {}: {e}", parent.display());
        }
    }
    match JsonFileStore::open(&path) {
        Ok(store) => {
            tracing::info!("State file: {}", store.path().display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Failed to open state file {}, state will not persist: {e}", path.display());
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Config comes first so its log level applies; a load failure is
    // reported once logging is up.
    let loaded = taskbar_config::load_config(args.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    if args.print_config {
        println!("{}", taskbar_config::config_to_json(&config));
        return;
    }

    // stdout carries the host protocol, so logs go to stderr.
    let default_directive = format!("taskbar={}", config.logging.level.as_str());
    let log_directive = match args.log_level.as_deref() {
        Some(level) if !level.contains('=') => format!("taskbar={level}"),
        Some(directive) => directive.to_string(),
        None => default_directive.clone(),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .or_else(|_| default_directive.parse())
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("Taskbar tabs v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let store = open_store(&config, &args);

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let host = Arc::new(BridgeHost::new(outbound_tx.clone(), CALL_TIMEOUT));
    let chrome: Arc<dyn WindowChrome> = if args.no_chrome {
        tracing::info!("Window chrome integration disabled");
        Arc::new(NoopChrome)
    } else {
        host.clone()
    };
    let engine = Engine::new(&config, host.clone(), chrome, store);

    let bridge = Bridge::new(engine, host, outbound_tx);
    tracing::info!("Serving host on stdin/stdout");
    if let Err(e) = bridge
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), outbound_rx)
        .await
    {
        tracing::error!("Host connection error: {e}");
    }
    tracing::info!("Shutdown complete");
}
