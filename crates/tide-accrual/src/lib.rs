//! # tide-accrual: Linear interest accrual engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! Interest is simple, not compounding: a holder with raw balance `B` and
//! frozen rate `r` is owed `B * r * t / PRECISION_FACTOR` after `t` seconds.
//! Intermediates are computed in 512-bit integers so no realistic balance,
//! rate, or elapsed time can overflow before the final narrowing.

pub mod engine;

pub use engine::{AccrualEngine, elapsed_since, growth_factor};
