//! Accrual engine implementing the [`AccrualCalculator`] trait.
//!
//! Computes linear interest since a holder's last settlement.
//! All arithmetic is integer-only with U256/U512 intermediates for overflow safety.

use primitive_types::{U256, U512};
use tide_core::constants::PRECISION_FACTOR;
use tide_core::error::AccrualError;
use tide_core::traits::AccrualCalculator;
use tide_core::types::{Amount, Rate, Timestamp};

/// The production interest calculator.
///
/// Implements [`AccrualCalculator`] with:
/// - Linear growth factor `PRECISION + rate * elapsed`
/// - Truncating integer division (interest is always rounded down)
/// - Zero interest for zero balance, zero rate, or zero elapsed time
#[derive(Debug, Clone, Default)]
pub struct AccrualEngine;

impl AccrualEngine {
    /// Create a new AccrualEngine.
    pub fn new() -> Self {
        Self
    }
}

/// Seconds of accrual owed since `last_settled`.
///
/// A holder that was never settled has nothing to accrue, so `None` yields 0
/// instead of counting from the clock epoch. A `last_settled` in the future is
/// clamped to 0.
pub fn elapsed_since(last_settled: Option<Timestamp>, now: Timestamp) -> u64 {
    last_settled.map_or(0, |last| now.saturating_sub(last))
}

/// Linear growth factor `PRECISION_FACTOR + rate * elapsed`, in fixed point.
///
/// `rate` and `elapsed` are at most 128 and 64 bits, so the product fits
/// comfortably in 256 bits.
pub fn growth_factor(rate: Rate, elapsed: u64) -> U256 {
    U256::from(PRECISION_FACTOR) + U256::from(rate) * U256::from(elapsed)
}

impl AccrualCalculator for AccrualEngine {
    fn accrued_interest(
        &self,
        raw_balance: Amount,
        rate: Rate,
        elapsed: u64,
    ) -> Result<Amount, AccrualError> {
        if raw_balance == 0 || rate == 0 || elapsed == 0 {
            return Ok(0);
        }

        // accrued_balance = raw * growth / PRECISION, with a 512-bit product.
        let growth = U512::from(growth_factor(rate, elapsed));
        let grown = U512::from(raw_balance) * growth / U512::from(PRECISION_FACTOR);

        // grown >= raw because growth >= PRECISION.
        let interest = grown - U512::from(raw_balance);
        if interest > U512::from(Amount::MAX) {
            return Err(AccrualError::ArithmeticOverflow);
        }
        Ok(interest.low_u128())
    }
}
