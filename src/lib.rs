//! MATKA — bet classification, Ank grouping and exposure engine.
//!
//! Library crate exposing all modules for use by integration tests
//! and the operator binary.

pub mod config;
pub mod types;
pub mod classify;
pub mod ank;
pub mod exposure;
pub mod round;
pub mod storage;
pub mod desk;
