//! The `PromptStore` and `SettingsStore` traits.
//!
//! The traits are implemented by storage backends (the SQLite backend lives
//! in `prompts-store-sqlite`, the in-memory backend in [`crate::memory`]). Higher layers (`prompts-app`, `prompts-cli`) depend on
//! this abstraction, not on any concrete backend, and pick a backend by
//! construction.

use std::future::Future;

use crate::{
  prompt::{
    Example, FileAttachment, NewExample, NewFile, NewPrompt, Prompt,
    PromptDetail, PromptId, PromptUpdate,
  },
  query::PromptQuery,
  settings::Settings,
};

// ─── Error classification ────────────────────────────────────────────────────

/// Coarse classification of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The requested prompt does not exist.
  NotFound,
  /// The underlying unit of work failed to open or commit.
  Storage,
}

/// Implemented by every backend error type so callers can tell a missing
/// record apart from a storage failure without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;

  fn is_not_found(&self) -> bool { self.kind() == ErrorKind::NotFound }
}

// ─── Prompts ─────────────────────────────────────────────────────────────────

/// Abstraction over a prompt store backend.
///
/// Every mutating operation is atomic with respect to one aggregate (a prompt
/// with its files and examples): either all of its writes are committed or
/// none are.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait PromptStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new prompt together with its files and examples and return
  /// the assigned identifier. `created_at` and `updated_at` are set by the
  /// store to the same instant.
  fn create_prompt(
    &self,
    draft: NewPrompt,
  ) -> impl Future<Output = Result<PromptId, Self::Error>> + Send + '_;

  /// Return the prompt merged with its dependents. Fails with a not-found
  /// error if no prompt has this identifier.
  fn get_prompt(
    &self,
    id: PromptId,
  ) -> impl Future<Output = Result<PromptDetail, Self::Error>> + Send + '_;

  /// Shallow-merge `update` over the stored prompt and refresh `updated_at`.
  /// Dependents are left untouched.
  fn update_prompt(
    &self,
    id: PromptId,
    update: PromptUpdate,
  ) -> impl Future<Output = Result<Prompt, Self::Error>> + Send + '_;

  /// Delete the prompt and every file and example that references it.
  /// Deleting an unknown identifier is a no-op.
  fn delete_prompt(
    &self,
    id: PromptId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every prompt, without dependents, in ascending identifier order.
  fn get_all_prompts(
    &self,
  ) -> impl Future<Output = Result<Vec<Prompt>, Self::Error>> + Send + '_;

  /// Every prompt matching `query` (see [`PromptQuery::matches`]). A full
  /// scan; content is not indexed.
  fn search_prompts<'a>(
    &'a self,
    query: &'a PromptQuery,
  ) -> impl Future<Output = Result<Vec<Prompt>, Self::Error>> + Send + 'a;

  /// Attach a file to an existing prompt.
  fn attach_file(
    &self,
    id: PromptId,
    file: NewFile,
  ) -> impl Future<Output = Result<FileAttachment, Self::Error>> + Send + '_;

  /// Add an example to an existing prompt.
  fn add_example(
    &self,
    id: PromptId,
    example: NewExample,
  ) -> impl Future<Output = Result<Example, Self::Error>> + Send + '_;
}

// ─── Settings ────────────────────────────────────────────────────────────────

/// Key-value persistence for the [`Settings`] singleton.
pub trait SettingsStore: Send + Sync {
  type Error: StoreError;

  /// The stored settings, or `None` if they were never saved.
  fn load_settings(
    &self,
  ) -> impl Future<Output = Result<Option<Settings>, Self::Error>> + Send + '_;

  fn save_settings(
    &self,
    settings: Settings,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
