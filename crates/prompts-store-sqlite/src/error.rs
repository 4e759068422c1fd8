//! Error type for `prompts-store-sqlite`.

use prompts_core::{
  prompt::PromptId,
  store::{ErrorKind, StoreError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("Prompt not found: {0}")]
  PromptNotFound(PromptId),
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::PromptNotFound(_) => ErrorKind::NotFound,
      Self::Database(_) | Self::Json(_) | Self::DateParse(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
