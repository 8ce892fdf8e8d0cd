//! Global rate and per-holder rate/settlement records.
//!
//! A holder's frozen rate and last-settlement time live in one
//! [`HolderRecord`] so both are always read and written together.

use std::collections::HashMap;

use tide_core::constants::MAX_INTEREST_RATE;
use tide_core::error::{ConfigError, RateError};
use tide_core::types::{HolderId, HolderState, Rate, Timestamp};

use crate::config::{LedgerConfig, RatePolicy};

/// Accrual state of one holder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HolderRecord {
    /// Rate frozen at first credit. `None` accrues at zero.
    pub rate: Option<Rate>,
    /// Time of the last settlement. `None` means never settled.
    pub last_settled: Option<Timestamp>,
}

/// Owner of the global rate and of every holder's accrual record.
#[derive(Debug, Clone)]
pub struct RateRegistry {
    global_rate: Rate,
    policy: RatePolicy,
    holders: HashMap<HolderId, HolderRecord>,
}

impl RateRegistry {
    /// Build a registry from a validated config.
    pub fn new(config: &LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            global_rate: config.initial_rate,
            policy: config.rate_policy,
            holders: HashMap::new(),
        })
    }

    pub fn global_rate(&self) -> Rate {
        self.global_rate
    }

    pub fn policy(&self) -> RatePolicy {
        self.policy
    }

    /// Replace the global rate, returning the previous one.
    ///
    /// # Errors
    ///
    /// - [`RateError::PolicyViolation`] if the policy forbids the move
    /// - [`RateError::AboveMaximum`] if `new_rate` exceeds [`MAX_INTEREST_RATE`]
    pub fn set_global_rate(&mut self, new_rate: Rate) -> Result<Rate, RateError> {
        if !self.policy.permits(self.global_rate, new_rate) {
            return Err(RateError::PolicyViolation {
                current: self.global_rate,
                attempted: new_rate,
            });
        }
        if new_rate > MAX_INTEREST_RATE {
            return Err(RateError::AboveMaximum {
                rate: new_rate,
                max: MAX_INTEREST_RATE,
            });
        }
        Ok(std::mem::replace(&mut self.global_rate, new_rate))
    }

    /// Record for `holder`, defaulted when unknown.
    pub fn record(&self, holder: &HolderId) -> HolderRecord {
        self.holders.get(holder).copied().unwrap_or_default()
    }

    /// Frozen rate of `holder`, zero if never seeded.
    pub fn holder_rate(&self, holder: &HolderId) -> Rate {
        self.record(holder).rate.unwrap_or(0)
    }

    pub fn is_seeded(&self, holder: &HolderId) -> bool {
        self.record(holder).rate.is_some()
    }

    pub fn holder_state(&self, holder: &HolderId) -> HolderState {
        if self.is_seeded(holder) {
            HolderState::Active
        } else {
            HolderState::Unseeded
        }
    }

    /// Overwrite the frozen rate of `holder` unconditionally.
    pub fn freeze_holder_rate(&mut self, holder: &HolderId, rate: Rate) {
        self.holders.entry(*holder).or_default().rate = Some(rate);
    }

    pub fn last_settled(&self, holder: &HolderId) -> Option<Timestamp> {
        self.record(holder).last_settled
    }

    /// Advance the settlement baseline of `holder` to `now`.
    ///
    /// Never moves the baseline backwards, so a regressing clock cannot make
    /// an interval accrue twice.
    pub fn mark_settled(&mut self, holder: &HolderId, now: Timestamp) {
        let record = self.holders.entry(*holder).or_default();
        record.last_settled = Some(record.last_settled.map_or(now, |last| last.max(now)));
    }

    /// Every holder the registry has a record for.
    pub fn holders(&self) -> impl Iterator<Item = &HolderId> {
        self.holders.keys()
    }

    /// Number of holders with a record.
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}
