use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{DEFAULT_LIST_LIMIT, DEFAULT_STATS_WINDOW, MAX_LIST_LIMIT};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub analytics: AnalyticsConfig,
}

/// Read windows and list bounds. Decision thresholds are constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Recent answers feeding the stats report.
    pub stats_window: usize,
    pub history_default_limit: usize,
    pub max_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            stats_window: DEFAULT_STATS_WINDOW,
            history_default_limit: DEFAULT_LIST_LIMIT,
            max_limit: MAX_LIST_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = AnalyticsConfig::default();
        let max_limit = env_or_parse("ANALYTICS_MAX_LIMIT", defaults.max_limit).max(1);
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/skill-analytics.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            analytics: AnalyticsConfig {
                stats_window: env_or_parse("ANALYTICS_STATS_WINDOW", defaults.stats_window).max(1),
                history_default_limit: env_or_parse(
                    "ANALYTICS_HISTORY_DEFAULT_LIMIT",
                    defaults.history_default_limit,
                )
                .clamp(1, max_limit),
                max_limit,
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
