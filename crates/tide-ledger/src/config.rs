//! Ledger configuration.
//!
//! Provides [`LedgerConfig`] with the starting global rate and the direction
//! in which that rate may later move.

use serde::{Deserialize, Serialize};
use tide_core::constants::{DEFAULT_INTEREST_RATE, MAX_INTEREST_RATE};
use tide_core::error::ConfigError;
use tide_core::types::Rate;

/// Direction the global rate is allowed to move after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// Rate may only be lowered. Early holders keep the best rate.
    #[default]
    NonIncreasing,
    /// Rate may only be raised. Rejects any decrease.
    NonDecreasing,
}

impl RatePolicy {
    /// Whether moving from `current` to `proposed` is allowed. Equal is always allowed.
    pub fn permits(self, current: Rate, proposed: Rate) -> bool {
        match self {
            Self::NonIncreasing => proposed <= current,
            Self::NonDecreasing => proposed >= current,
        }
    }
}

/// Configuration for a ledger instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Global rate at launch, scaled by `PRECISION_FACTOR`.
    pub initial_rate: Rate,
    /// Allowed direction for later rate changes.
    pub rate_policy: RatePolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_rate: DEFAULT_INTEREST_RATE,
            rate_policy: RatePolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Check bounds before a ledger is built from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_rate > MAX_INTEREST_RATE {
            return Err(ConfigError::InvalidInitialRate {
                rate: self.initial_rate,
                max: MAX_INTEREST_RATE,
            });
        }
        Ok(())
    }

    pub fn with_initial_rate(mut self, rate: Rate) -> Self {
        self.initial_rate = rate;
        self
    }

    pub fn with_rate_policy(mut self, policy: RatePolicy) -> Self {
        self.rate_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_and_policy() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.initial_rate, DEFAULT_INTEREST_RATE);
        assert_eq!(cfg.rate_policy, RatePolicy::NonIncreasing);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_increasing_permits_lower_and_equal() {
        let p = RatePolicy::NonIncreasing;
        assert!(p.permits(10, 9));
        assert!(p.permits(10, 10));
        assert!(!p.permits(10, 11));
    }

    #[test]
    fn non_decreasing_permits_higher_and_equal() {
        let p = RatePolicy::NonDecreasing;
        assert!(p.permits(10, 11));
        assert!(p.permits(10, 10));
        assert!(!p.permits(10, 9));
    }

    #[test]
    fn rate_above_maximum_is_invalid() {
        let cfg = LedgerConfig::default().with_initial_rate(MAX_INTEREST_RATE + 1);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidInitialRate {
                rate: MAX_INTEREST_RATE + 1,
                max: MAX_INTEREST_RATE
            })
        );
    }

    #[test]
    fn policy_parses_from_json() {
        let cfg: LedgerConfig = serde_json::from_str(r#"{"rate_policy":"non_decreasing"}"#).unwrap();
        assert_eq!(cfg.rate_policy, RatePolicy::NonDecreasing);
        assert_eq!(cfg.initial_rate, DEFAULT_INTEREST_RATE);
    }

    #[test]
    fn config_is_clone_and_debug() {
        let cfg = LedgerConfig::default().with_rate_policy(RatePolicy::NonDecreasing);
        let debug = format!("{:?}", cfg.clone());
        assert!(debug.contains("LedgerConfig"));
    }
}
