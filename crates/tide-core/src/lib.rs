//! # tide-core
//! Foundation types, traits, and errors for the Tide interest ledger.

pub mod auth;
pub mod clock;
pub mod constants;
pub mod error;
pub mod raw_ledger;
pub mod traits;
pub mod types;
