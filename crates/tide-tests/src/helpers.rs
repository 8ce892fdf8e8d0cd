//! Shared test helpers for scenario and invariant tests.

use std::sync::Arc;

use tide_core::auth::{OwnerAuthorizer, RateAdmin};
use tide_core::clock::ManualClock;
use tide_core::constants::PRECISION_FACTOR;
use tide_core::traits::Authorizer;
use tide_core::types::{Amount, HolderId, Rate, Timestamp};
use tide_ledger::{InterestLedger, LedgerConfig, MemoryLedger};

/// One whole token at 18 decimals.
pub const TOKEN: Amount = 1_000_000_000_000_000_000;

/// Arbitrary non-zero starting time for every test ledger.
pub const GENESIS: Timestamp = 1_700_000_000;

pub type TestLedger = MemoryLedger<Arc<ManualClock>>;

/// Simple holder identity from a seed byte.
pub fn holder(seed: u8) -> HolderId {
    HolderId([seed; 20])
}

/// The identity allowed to change the global rate.
pub fn owner() -> HolderId {
    holder(0xff)
}

/// Rate-admin capability for [`owner`], issued through the owner authorizer.
pub fn admin() -> RateAdmin {
    OwnerAuthorizer::new(owner())
        .authorize_rate_admin(&owner())
        .expect("owner is authorized")
}

/// Fresh in-memory ledger plus a handle to its clock.
pub fn ledger_with(config: LedgerConfig) -> (TestLedger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(GENESIS));
    let ledger = InterestLedger::in_memory(config, clock.clone()).expect("valid config");
    (ledger, clock)
}

/// Fresh ledger with the default config.
pub fn ledger() -> (TestLedger, Arc<ManualClock>) {
    ledger_with(LedgerConfig::default())
}

/// Expected linear interest, truncated.
pub fn simple_interest(raw: Amount, rate: Rate, secs: u64) -> Amount {
    raw * rate * secs as u128 / PRECISION_FACTOR
}
