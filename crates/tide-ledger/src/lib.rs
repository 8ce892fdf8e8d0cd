//! # tide-ledger
//!
//! Composes the accrual engine with raw bookkeeping into the public ledger:
//! - [`RateRegistry`]: global rate under a monotonic policy, plus one
//!   `{ rate, last_settled }` record per holder
//! - [`SettlementCoordinator`]: quotes and materializes accrued interest
//! - [`InterestLedger`]: mint, burn, transfer, transfer_from, rate changes,
//!   and accrual-aware balance queries

pub mod config;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod settlement;

pub use config::{LedgerConfig, RatePolicy};
pub use events::LedgerEvent;
pub use ledger::{InterestLedger, MemoryLedger};
pub use registry::{HolderRecord, RateRegistry};
pub use settlement::{Settlement, SettlementCoordinator};
