//! Core types and trait definitions for the persona document store.
//!
//! This crate is deliberately free of HTTP dependencies. The remote backend
//! and the MCP server depend on it; the only store it ships is the in-memory
//! reference implementation.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod history;
pub mod memory;
pub mod persona;
pub mod repo;
pub mod store;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
