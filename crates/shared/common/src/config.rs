//! Shared configuration structures.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default directory for file-backed storage
pub const DEFAULT_DATA_DIR: &str = ".caresync";

/// Default simulated round-trip for login and signup
pub const DEFAULT_LATENCY_MS: u64 = 600;

/// Default capacity of the change notification channel
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding one JSON file per storage key
    pub data_dir: PathBuf,
    /// Seed default users, profiles and tasks into absent slots on open
    pub seed_defaults: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed_defaults: true,
        }
    }
}

/// Change notification bus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusConfig {
    /// Buffered notifications per subscriber before it is considered lagging
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

/// Data access layer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Simulated network latency applied to login and signup, in milliseconds
    pub auth_latency_ms: u64,
}

impl ServiceConfig {
    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }

    /// No simulated latency; used by in-memory stores and tests
    pub fn immediate() -> Self {
        Self { auth_latency_ms: 0 }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth_latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CareConfig {
    pub store: StoreConfig,
    pub bus: BusConfig,
    pub service: ServiceConfig,
}

impl CareConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            store: StoreConfig {
                data_dir: env::var("CARESYNC_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.store.data_dir),
                seed_defaults: env::var("CARESYNC_SEED")
                    .ok()
                    .and_then(|v| parse_flag(&v))
                    .unwrap_or(defaults.store.seed_defaults),
            },
            bus: BusConfig {
                capacity: env::var("CARESYNC_BUS_CAPACITY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|c: &usize| *c > 0)
                    .unwrap_or(defaults.bus.capacity),
            },
            service: ServiceConfig {
                auth_latency_ms: env::var("CARESYNC_LATENCY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.service.auth_latency_ms),
            },
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CareConfig::default();
        assert_eq!(config.service.auth_latency(), Duration::from_millis(600));
        assert_eq!(config.bus.capacity, DEFAULT_BUS_CAPACITY);
        assert!(config.store.seed_defaults);
    }

    #[test]
    fn test_immediate_has_no_latency() {
        assert!(ServiceConfig::immediate().auth_latency().is_zero());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
