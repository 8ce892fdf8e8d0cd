//! Trait interfaces for the Tide ledger.
//!
//! These traits define the contracts between crates and collaborators:
//! - [`RawLedger`]: un-accrued balance and allowance bookkeeping
//! - [`AccrualCalculator`]: interest math engine (tide-accrual implements)
//! - [`Clock`]: monotonic time source
//! - [`Authorizer`]: issues the capability required to change the global rate

use std::sync::Arc;

use crate::auth::RateAdmin;
use crate::error::{AccrualError, AuthError, LedgerError};
use crate::types::{Amount, HolderId, Rate, Timestamp};

/// Standard fungible-token bookkeeping without any interest awareness.
///
/// Balances here are "raw": exactly what was credited or debited, excluding
/// interest that has accrued but not been settled. Every mutating method is
/// all-or-nothing.
pub trait RawLedger: Send + Sync {
    /// Recorded balance of `holder`. Unknown holders have zero.
    fn raw_balance_of(&self, holder: &HolderId) -> Amount;

    /// Sum of all raw balances.
    fn total_supply(&self) -> Amount;

    /// Add `amount` to `holder` and to the total supply.
    fn credit(&mut self, holder: &HolderId, amount: Amount) -> Result<(), LedgerError>;

    /// Remove `amount` from `holder` and from the total supply.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if `holder` holds less than `amount`
    fn debit(&mut self, holder: &HolderId, amount: Amount) -> Result<(), LedgerError>;

    /// Move `amount` from one holder to another. Total supply is unchanged.
    fn move_raw(&mut self, from: &HolderId, to: &HolderId, amount: Amount)
    -> Result<(), LedgerError>;

    /// Amount `spender` may still move on behalf of `owner`.
    fn allowance(&self, owner: &HolderId, spender: &HolderId) -> Amount;

    /// Set the allowance of `spender` over `owner`'s balance.
    fn approve(&mut self, owner: &HolderId, spender: &HolderId, amount: Amount);

    /// Consume `amount` of allowance. `Amount::MAX` allowances are unlimited.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientAllowance`] if the allowance is smaller than `amount`
    fn spend_allowance(
        &mut self,
        owner: &HolderId,
        spender: &HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// Pure computation of simple (non-compounding) interest.
///
/// All math is integer fixed-point scaled by
/// [`PRECISION_FACTOR`](crate::constants::PRECISION_FACTOR).
/// Implemented by the accrual engine (tide-accrual).
pub trait AccrualCalculator: Send + Sync {
    /// Interest owed on `raw_balance` held at `rate` for `elapsed` seconds.
    ///
    /// Computes `raw * (PRECISION + rate * elapsed) / PRECISION - raw`.
    fn accrued_interest(
        &self,
        raw_balance: Amount,
        rate: Rate,
        elapsed: u64,
    ) -> Result<Amount, AccrualError>;

    /// Raw balance plus accrued interest.
    ///
    /// Default implementation: `raw_balance + accrued_interest(...)`.
    fn accrued_balance(
        &self,
        raw_balance: Amount,
        rate: Rate,
        elapsed: u64,
    ) -> Result<Amount, AccrualError> {
        let interest = self.accrued_interest(raw_balance, rate, elapsed)?;
        raw_balance
            .checked_add(interest)
            .ok_or(AccrualError::ArithmeticOverflow)
    }
}

/// Source of "now" for the ledger, in seconds.
///
/// Expected to be non-decreasing across calls; the ledger clamps otherwise.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Access control for administrative operations.
///
/// The ledger never checks callers itself; it only accepts the
/// [`RateAdmin`] capability an authorizer hands out.
pub trait Authorizer: Send + Sync {
    /// Issue a rate-admin capability for `caller`, or reject.
    fn authorize_rate_admin(&self, caller: &HolderId) -> Result<RateAdmin, AuthError>;
}
