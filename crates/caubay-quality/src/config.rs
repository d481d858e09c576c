//! Engine configuration.
//!
//! Provides [`EngineConfig`] with defaults suitable for an interactive front
//! end. The configuration can be built programmatically or read from the
//! environment.

use caubay_core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`EngineConfig::cache_capacity`].
pub const CACHE_CAPACITY_ENV: &str = "CAUBAY_CACHE_CAPACITY";

/// Distinct (rainfall, temperature) ladders kept by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Configuration for a [`WaterQualityEngine`](crate::WaterQualityEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of cached ladders. Reaching it clears the cache;
    /// 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { cache_capacity: DEFAULT_CACHE_CAPACITY }
    }
}

impl EngineConfig {
    /// A configuration that rebuilds the ladder on every call.
    pub fn uncached() -> Self {
        Self { cache_capacity: 0 }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(CACHE_CAPACITY_ENV) {
            config.cache_capacity = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: CACHE_CAPACITY_ENV.to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(config)
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache_capacity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn default_capacity() {
        let c = EngineConfig::default();
        assert_eq!(c.cache_capacity, 256);
        assert!(c.caching_enabled());
    }

    #[test]
    fn uncached_disables_cache() {
        assert!(!EngineConfig::uncached().caching_enabled());
    }

    #[test]
    fn unset_keeps_default() {
        let c = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(c, EngineConfig::default());
    }

    #[test]
    fn override_from_lookup() {
        let c = EngineConfig::from_lookup(lookup(&[(CACHE_CAPACITY_ENV, " 16 ")])).unwrap();
        assert_eq!(c.cache_capacity, 16);
        let c = EngineConfig::from_lookup(lookup(&[(CACHE_CAPACITY_ENV, "0")])).unwrap();
        assert!(!c.caching_enabled());
    }

    #[test]
    fn invalid_value_is_reported() {
        let err = EngineConfig::from_lookup(lookup(&[(CACHE_CAPACITY_ENV, "-3")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue { key: CACHE_CAPACITY_ENV.into(), value: "-3".into() }
        );
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&EngineConfig { cache_capacity: 8 }).unwrap();
        assert_eq!(json, r#"{"cache_capacity":8}"#);
    }
}
