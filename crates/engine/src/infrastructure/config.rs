//! Engine configuration from the environment.

use std::str::FromStr;

const DEFAULT_DATABASE_PATH: &str = "arena.db";
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_NOTIFY_CAPACITY: usize = 256;

/// Which battle/character store backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown store '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub store: StoreKind,
    pub database_path: String,
    pub server_host: String,
    pub server_port: u16,
    /// Messages buffered per WebSocket observer before it is skipped
    pub notify_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Sqlite,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// anything missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let store = parse_or_default(&lookup, "ARENA_STORE", defaults.store);
        let database_path = lookup("DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.database_path);
        let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = if lookup("SERVER_PORT").is_some() {
            parse_or_default(&lookup, "SERVER_PORT", defaults.server_port)
        } else {
            parse_or_default(&lookup, "PORT", defaults.server_port)
        };
        let notify_capacity =
            parse_or_default(&lookup, "NOTIFY_CAPACITY", defaults.notify_capacity).max(1);

        Self {
            store,
            database_path,
            server_host,
            server_port,
            notify_capacity,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, default = ?default, "Invalid config value, using default");
            default
        }
    }
}
