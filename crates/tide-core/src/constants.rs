//! Ledger constants. Rates are per-second fractions scaled by [`PRECISION_FACTOR`].

use crate::types::Rate;

/// Fixed-point denominator for all interest rates (1.0 == 10^18).
pub const PRECISION_FACTOR: u128 = 1_000_000_000_000_000_000;

/// Global rate a fresh ledger starts with: 5 * 10^-8 per second.
///
/// # Examples
///
/// ```
/// use tide_core::constants::{DEFAULT_INTEREST_RATE, PRECISION_FACTOR};
/// assert!(DEFAULT_INTEREST_RATE < PRECISION_FACTOR);
/// ```
pub const DEFAULT_INTEREST_RATE: Rate = 50_000_000_000;

/// Upper bound for any global rate: 100% of principal per second.
pub const MAX_INTEREST_RATE: Rate = PRECISION_FACTOR;

/// Length of the hex-encoded holder identity body (20 bytes).
pub const HOLDER_ID_LEN: usize = 20;
