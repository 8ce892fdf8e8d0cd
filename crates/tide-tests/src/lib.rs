//! Shared fixtures for the Tide integration tests.

pub mod helpers;
