//! Application layer for the prompt library: address-driven routing, the
//! typed event bus, and the view components the terminal shell renders.
//!
//! Nothing here touches a terminal or a database directly. Views talk to an
//! injected [`PromptStore`](prompts_core::store::PromptStore) and to each other
//! through the [`events::EventBus`].

pub mod error;
pub mod events;
pub mod history;
pub mod route;
pub mod router;
pub mod shell;
pub mod views;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result, ValidationError};
pub use shell::Shell;
