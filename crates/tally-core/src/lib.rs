//! Core types and domain logic for the Tally deadline ledger.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! state transitions live on [`book::Book`]; persistence backends implement
//! [`store::LedgerStore`]; [`ledger::Ledger`] ties the two together.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod book;
pub mod deadline;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod rank;
pub mod store;
pub mod user;

pub use error::{Error, Result};
