//! Engine configuration
//!
//! Defaults reproduce the reference behaviour of the calculators. A config can be
//! read from a JSON file and then overridden from the environment:
//!   FORECAST_CACHE_CAPACITY, FORECAST_IRR_MAX_ITERATIONS, FORECAST_IRR_TOLERANCE

use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::path::Path;

use crate::error::Result;

/// Default number of memoized results kept per calculator
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Tolerance (percentage points) when checking that percentages sum to 100
pub const DEFAULT_PERCENT_TOLERANCE: f64 = 0.1;

/// Bisection settings for the IRR search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrSettings {
    /// Lower bound of the search range, in percent
    pub lower_pct: f64,
    /// Upper bound of the search range, in percent
    pub upper_pct: f64,
    pub max_iterations: u32,
    /// Stop once |NPV(mid)| falls below this amount
    pub tolerance: f64,
}

impl Default for IrrSettings {
    fn default() -> Self {
        Self {
            lower_pct: 0.0,
            upper_pct: 100.0,
            max_iterations: 20,
            tolerance: 0.01,
        }
    }
}

/// Configuration shared by all calculators of a [`crate::ForecastEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entries kept per calculator cache before least-recently-used eviction
    pub cache_capacity: usize,

    pub irr: IrrSettings,

    /// Allowed deviation of scenario probabilities from 100%
    pub probability_tolerance: f64,

    /// Allowed deviation of product sales mix from 100%
    pub sales_mix_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            irr: IrrSettings::default(),
            probability_tolerance: DEFAULT_PERCENT_TOLERANCE,
            sales_mix_tolerance: DEFAULT_PERCENT_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Default config with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides; unparsable values are ignored
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(capacity) = env_value::<usize>("FORECAST_CACHE_CAPACITY") {
            self.cache_capacity = capacity;
        }
        if let Some(iterations) = env_value::<u32>("FORECAST_IRR_MAX_ITERATIONS") {
            self.irr.max_iterations = iterations;
        }
        if let Some(tolerance) = env_value::<f64>("FORECAST_IRR_TOLERANCE") {
            self.irr.tolerance = tolerance;
        }
        self
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::{const_mutex, Mutex};
    use std::io::Write;

    // Environment is process-global; tests touching FORECAST_* take this lock
    static ENV_LOCK: Mutex<()> = const_mutex(());

    const ENV_VARS: [&str; 3] = [
        "FORECAST_CACHE_CAPACITY",
        "FORECAST_IRR_MAX_ITERATIONS",
        "FORECAST_IRR_TOLERANCE",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_capacity, 1024);
        assert_eq!(config.irr.max_iterations, 20);
        assert_eq!(config.irr.tolerance, 0.01);
        assert_eq!(config.irr.upper_pct, 100.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cache_capacity": 16, "irr": {{ "max_iterations": 50 }} }}"#).unwrap();

        let config = EngineConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.irr.max_iterations, 50);
        assert_eq!(config.irr.tolerance, 0.01);
        assert_eq!(config.sales_mix_tolerance, 0.1);
    }

    #[test]
    fn test_missing_file() {
        assert!(EngineConfig::from_json_path(Path::new("/nonexistent/forecast.json")).is_err());
    }

    #[test]
    fn test_env_overrides_apply() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("FORECAST_CACHE_CAPACITY", "64");
        env::set_var("FORECAST_IRR_MAX_ITERATIONS", "40");
        env::set_var("FORECAST_IRR_TOLERANCE", "0.001");

        let config = EngineConfig::from_env();
        clear_env();

        assert_eq!(config.cache_capacity, 64);
        assert_eq!(config.irr.max_iterations, 40);
        assert_eq!(config.irr.tolerance, 0.001);
        assert_eq!(config.irr.upper_pct, 100.0);
    }

    #[test]
    fn test_unparsable_env_values_are_ignored() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("FORECAST_CACHE_CAPACITY", "lots");
        env::set_var("FORECAST_IRR_MAX_ITERATIONS", "-3");
        env::set_var("FORECAST_IRR_TOLERANCE", "tight");

        let config = EngineConfig::from_env();
        clear_env();

        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cache_capacity": 16, "irr": {{ "max_iterations": 50 }} }}"#).unwrap();
        env::set_var("FORECAST_IRR_MAX_ITERATIONS", "7");

        let config = EngineConfig::from_json_path(file.path()).unwrap().with_env_overrides();
        clear_env();

        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.irr.max_iterations, 7);
    }
}
