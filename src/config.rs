//! Runtime settings.
//!
//! Values come from the environment (a `.env` file is loaded by the binary)
//! and fall back to the defaults below.

use std::path::PathBuf;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_HISTORY_VERSION: &str = "v1";
/// AS_PATHs with more ASNs than this are reported as unusually long.
pub const DEFAULT_LONG_PATH_THRESHOLD: usize = 50;
pub const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::Pacific::Auckland;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the `<tool>-<version>.json` history files.
    pub history_dir: PathBuf,
    pub history_limit: usize,
    pub history_version: String,
    pub long_path_threshold: usize,
    /// Zone used when printing history timestamps.
    pub timezone: chrono_tz::Tz,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_dir: PathBuf::from("."),
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_version: DEFAULT_HISTORY_VERSION.to_string(),
            long_path_threshold: DEFAULT_LONG_PATH_THRESHOLD,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl Config {
    /// Read `NETCALC_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; invalid values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(dir) = lookup("NETCALC_HISTORY_DIR") {
            config.history_dir = PathBuf::from(dir);
        }
        if let Some(limit) = parse_or_warn(&lookup, "NETCALC_HISTORY_LIMIT") {
            config.history_limit = limit;
        }
        if let Some(version) =
            lookup("NETCALC_HISTORY_VERSION").filter(|v| !v.trim().is_empty())
        {
            config.history_version = version.trim().to_string();
        }
        if let Some(threshold) = parse_or_warn(&lookup, "NETCALC_LONG_PATH") {
            config.long_path_threshold = threshold;
        }
        if let Some(tz) = parse_or_warn(&lookup, "NETCALC_TZ") {
            config.timezone = tz;
        }
        log::debug!("config: {:?}", config);
        config
    }
}

fn parse_or_warn<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid {key}={raw:?}, using default");
            None
        }
    }
}
