//! Error types for `prompts-core`.

use thiserror::Error;

use crate::{
  prompt::PromptId,
  store::{ErrorKind, StoreError},
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Prompt not found: {0}")]
  PromptNotFound(PromptId),

  /// The backing store could not complete the unit of work.
  #[error("storage error: {0}")]
  Storage(String),
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::PromptNotFound(_) => ErrorKind::NotFound,
      Self::Storage(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
