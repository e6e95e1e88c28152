//! Core types and trait definitions for the Moments journal.
//!
//! This crate is deliberately free of database dependencies. The SQLite
//! backend and the state containers both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod moment;
pub mod stats;
pub mod store;
pub mod tags;

pub use error::{Error, Result};
