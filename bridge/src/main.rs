use std::sync::Arc;

use tessumod_bridge::{BridgeConfig, BridgeError, SnapshotServer, TracingBackend};
use tessumod_plugin::{spawn_sync, UserCache};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    #[cfg(debug_assertions)]
    {
        use tracing::Level;
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    if let Err(e) = run(BridgeConfig::from_env()).await {
        error!("Bridge error: {}", e);
    }
}

async fn run(config: BridgeConfig) -> Result<(), BridgeError> {
    info!("Starting bridge with {:?}", config);

    let mut cache = UserCache::open(&config.user_cache_path);
    cache.on_read_error(|message| warn!("User cache unreadable: {}", message));
    if let Err(e) = cache.init() {
        warn!("Continuing with an empty user cache: {}", e);
    }
    let cache = Arc::new(Mutex::new(cache));
    let _sync = spawn_sync(cache, config.cache_sync_interval);

    let server = SnapshotServer::bind(&config.address).await?;
    server.run(TracingBackend::new()).await
}
