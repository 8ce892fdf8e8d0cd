//! Error types for the Tide ledger.
use thiserror::Error;

use crate::types::{Amount, HolderId, Rate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HolderIdParseError {
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid length: expected {expected} bytes, got {got}")] InvalidLength { expected: usize, got: usize },
}

/// Rejections from the global rate setter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error("rate policy violation: current {current}, attempted {attempted}")] PolicyViolation { current: Rate, attempted: Rate },
    #[error("rate {rate} exceeds maximum {max}")] AboveMaximum { rate: Rate, max: Rate },
}

/// Raw bookkeeping failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("insufficient allowance: have {have}, need {need}")] InsufficientAllowance { have: Amount, need: Amount },
    #[error("balance overflow")] BalanceOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccrualError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("caller {0} is not authorized to change the interest rate")] Unauthorized(HolderId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial rate {rate} exceeds maximum {max}")] InvalidInitialRate { rate: Rate, max: Rate },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TideError {
    #[error(transparent)] Rate(#[from] RateError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Accrual(#[from] AccrualError),
    #[error(transparent)] Auth(#[from] AuthError),
    #[error(transparent)] Config(#[from] ConfigError),
}
