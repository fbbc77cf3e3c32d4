use std::{collections::HashMap, str::FromStr};

use qload_core::probe::DEFAULT_SHUTDOWN_FILE_VAR;
use qload_exec::ComputeConfig;
use qload_model::CancelMode;
use qload_observe::{LoggerConfig, LoggerFormat};
use thiserror::Error;

pub const ENV_LOG_LEVEL: &str = "QLOAD_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "QLOAD_LOG_FORMAT";
pub const ENV_MAX_CONCURRENT_CALLS: &str = "QLOAD_MAX_CONCURRENT_CALLS";
pub const ENV_CANCEL_MODE: &str = "QLOAD_CANCEL_MODE";
pub const ENV_PROGRESS_EVERY: &str = "QLOAD_PROGRESS_EVERY";
pub const ENV_SHUTDOWN_FILE_VAR: &str = "QLOAD_SHUTDOWN_FILE_VAR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    pub max_concurrent_calls: usize,
    pub compute: ComputeConfig,
    /// Variable naming the host's shutdown-notification file.
    pub shutdown_file_var: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            max_concurrent_calls: 1,
            compute: ComputeConfig::default(),
            shutdown_file_var: DEFAULT_SHUTDOWN_FILE_VAR.to_string(),
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(|k| vars.get(k).cloned())
    }

    /// Build from a variable lookup; unset or blank variables keep their defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        let mut cfg = AgentConfig::default();

        let format = match get(ENV_LOG_FORMAT) {
            Some(raw) => parse_var::<LoggerFormat>(ENV_LOG_FORMAT, &raw)?,
            None => cfg.logger.format,
        };
        let level = get(ENV_LOG_LEVEL).unwrap_or_else(|| cfg.logger.level.clone());
        cfg.logger = LoggerConfig::new(format, level.trim());
        if let Some(max) = get(ENV_MAX_CONCURRENT_CALLS) {
            let max = parse_var::<usize>(ENV_MAX_CONCURRENT_CALLS, &max)?;
            if max == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_MAX_CONCURRENT_CALLS,
                    reason: "must be at least 1".into(),
                });
            }
            cfg.max_concurrent_calls = max;
        }
        if let Some(mode) = get(ENV_CANCEL_MODE) {
            cfg.compute.cancel_mode = parse_var::<CancelMode>(ENV_CANCEL_MODE, &mode)?;
        }
        if let Some(every) = get(ENV_PROGRESS_EVERY) {
            cfg.compute.progress_every = parse_var::<u64>(ENV_PROGRESS_EVERY, &every)?;
        }
        if let Some(var) = get(ENV_SHUTDOWN_FILE_VAR) {
            cfg.shutdown_file_var = var.trim().to_string();
        }
        Ok(cfg)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
