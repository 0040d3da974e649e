//! Server configuration from environment variables

use std::env;
use std::str::FromStr;

use crate::store::SeedConfig;

/// Runtime configuration for the market server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Full updates retained per session before a slow session starts skipping
    pub broadcast_capacity: usize,
    /// Pending commands the engine queue holds before callers wait
    pub command_queue: usize,
    pub seed: SeedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3001,
            broadcast_capacity: 16,
            command_queue: 256,
            seed: SeedConfig::default(),
        }
    }
}

/// Read and parse an environment variable, keeping `default` when it is unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Invalid value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Build the configuration from the environment
    ///
    /// - `PORT` (default 3001)
    /// - `MARKET_BIND_ADDRESS` (default `0.0.0.0`)
    /// - `MARKET_BROADCAST_CAPACITY` (default 16)
    /// - `MARKET_COMMAND_QUEUE` (default 256)
    /// - `MARKET_SEED_USERS` (default 60)
    /// - `MARKET_INITIAL_BALANCE` (default 100)
    /// - `MARKET_ADMIN_PASSWORD` (default `admin123`)
    /// - `MARKET_ADMIN_BCRYPT` (default false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("MARKET_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env_or("PORT", defaults.port),
            broadcast_capacity: env_or("MARKET_BROADCAST_CAPACITY", defaults.broadcast_capacity),
            command_queue: env_or("MARKET_COMMAND_QUEUE", defaults.command_queue),
            seed: SeedConfig {
                user_count: env_or("MARKET_SEED_USERS", defaults.seed.user_count),
                initial_balance: env_or("MARKET_INITIAL_BALANCE", defaults.seed.initial_balance),
                admin_password: env::var("MARKET_ADMIN_PASSWORD").unwrap_or(defaults.seed.admin_password),
                bcrypt_admin: env_or("MARKET_ADMIN_BCRYPT", defaults.seed.bcrypt_admin),
            },
        }
    }

    /// `host:port` to bind the listener to
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
