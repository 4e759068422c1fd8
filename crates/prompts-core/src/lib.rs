//! Core types and trait definitions for the prompt library.
//!
//! This crate is deliberately free of database and UI dependencies. Storage
//! backends implement [`store::PromptStore`]; the in-memory backend in
//! [`memory`] lives here so tests never need a real database.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod memory;
pub mod prompt;
pub mod query;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
