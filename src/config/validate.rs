// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{PoolConfig, RawConfigFile};
use crate::errors::ConfigError;

impl TryFrom<RawConfigFile> for PoolConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        let timeout = match raw.pool.timeout.as_deref() {
            None => None,
            Some(s) => {
                let d = parse_duration(s).map_err(|e| {
                    ConfigError::Invalid(format!("[pool].timeout: {e}"))
                })?;
                (!d.is_zero()).then_some(d)
            }
        };

        Ok(PoolConfig {
            max_concurrency: raw.pool.max_concurrency,
            timeout,
            mode: raw.pool.mode,
        })
    }
}

/// Parse durations like `"250ms"`, `"5s"`, `"2m"`, `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;

    match unit_part.trim().to_lowercase().as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        unit => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
