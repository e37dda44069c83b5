//! Configuration constants for the bridge.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default address the game mod connects to.
pub const DEFAULT_BRIDGE_ADDR: &str = "127.0.0.1:9101";

/// Default location of the user cache file.
pub const DEFAULT_USER_CACHE_PATH: &str = "tessu_mod_cache.toml";

/// Default interval between user cache file checks, in seconds.
pub const DEFAULT_CACHE_SYNC_SECS: u64 = 5;

/// Buffer size for reading from a connection.
pub const PACKET_BUFFER_SIZE: usize = 4096;

/// Runtime settings of the bridge binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub address: String,
    pub user_cache_path: PathBuf,
    pub cache_sync_interval: Duration,
}

impl BridgeConfig {
    /// Reads every setting from its environment variable, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            address: bridge_addr(),
            user_cache_path: user_cache_path(),
            cache_sync_interval: cache_sync_interval(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_BRIDGE_ADDR.to_string(),
            user_cache_path: PathBuf::from(DEFAULT_USER_CACHE_PATH),
            cache_sync_interval: Duration::from_secs(DEFAULT_CACHE_SYNC_SECS),
        }
    }
}

/// Returns the listen address from `TESSUMOD_BRIDGE_ADDR` env var or default.
#[must_use]
pub fn bridge_addr() -> String {
    env::var("TESSUMOD_BRIDGE_ADDR")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BRIDGE_ADDR.to_string())
}

/// Returns the user cache path from `TESSUMOD_USER_CACHE` env var or default.
#[must_use]
pub fn user_cache_path() -> PathBuf {
    env::var_os("TESSUMOD_USER_CACHE")
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_USER_CACHE_PATH), PathBuf::from)
}

/// Returns the cache sync interval from `TESSUMOD_CACHE_SYNC_SECS` env var or default.
/// Zero is treated as unset.
#[must_use]
pub fn cache_sync_interval() -> Duration {
    let secs = env::var("TESSUMOD_CACHE_SYNC_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_CACHE_SYNC_SECS);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    // All variables are touched from this single test so parallel tests never race on them.
    #[test]
    fn from_env_reads_overrides_and_falls_back() {
        env::set_var("TESSUMOD_BRIDGE_ADDR", "127.0.0.1:9200");
        env::set_var("TESSUMOD_USER_CACHE", "/tmp/cache.toml");
        env::set_var("TESSUMOD_CACHE_SYNC_SECS", "30");

        assert_eq!(
            BridgeConfig::from_env(),
            BridgeConfig {
                address: "127.0.0.1:9200".to_string(),
                user_cache_path: PathBuf::from("/tmp/cache.toml"),
                cache_sync_interval: Duration::from_secs(30),
            }
        );

        // Empty, zero and unparsable values mean "unset".
        env::set_var("TESSUMOD_BRIDGE_ADDR", "");
        env::set_var("TESSUMOD_USER_CACHE", "");
        env::set_var("TESSUMOD_CACHE_SYNC_SECS", "0");
        assert_eq!(BridgeConfig::from_env(), BridgeConfig::default());

        env::set_var("TESSUMOD_CACHE_SYNC_SECS", "soon");
        assert_eq!(cache_sync_interval(), Duration::from_secs(DEFAULT_CACHE_SYNC_SECS));

        env::remove_var("TESSUMOD_BRIDGE_ADDR");
        env::remove_var("TESSUMOD_USER_CACHE");
        env::remove_var("TESSUMOD_CACHE_SYNC_SECS");
        assert_eq!(BridgeConfig::from_env(), BridgeConfig::default());
    }

    #[test]
    fn default_matches_constants() {
        let config = BridgeConfig::default();
        assert_eq!(config.address, DEFAULT_BRIDGE_ADDR);
        assert_eq!(config.user_cache_path, PathBuf::from(DEFAULT_USER_CACHE_PATH));
        assert_eq!(config.cache_sync_interval, Duration::from_secs(DEFAULT_CACHE_SYNC_SECS));
    }
}
