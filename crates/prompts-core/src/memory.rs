//! [`MemoryStore`], an in-process implementation of [`PromptStore`] and
//! [`SettingsStore`].
//!
//! Used for tests and for `--in-memory` sessions. All tables sit behind one
//! mutex and every operation runs under a single lock acquisition, which
//! makes each operation atomic with respect to its aggregate.

use std::{
  collections::BTreeMap,
  sync::{Arc, Mutex, MutexGuard},
};

use chrono::Utc;
use tracing::debug;

use crate::{
  Error, Result,
  prompt::{
    Example, ExampleId, FileAttachment, FileId, NewExample, NewFile,
    NewPrompt, Prompt, PromptDetail, PromptId, PromptUpdate,
  },
  query::PromptQuery,
  settings::Settings,
  store::{PromptStore, SettingsStore},
};

#[derive(Default)]
struct Tables {
  last_prompt_id:  i64,
  last_file_id:    i64,
  last_example_id: i64,
  prompts:         BTreeMap<PromptId, Prompt>,
  files:           BTreeMap<FileId, FileAttachment>,
  examples:        BTreeMap<ExampleId, Example>,
  settings:        Option<Settings>,
}

impl Tables {
  fn insert_file(&mut self, prompt_id: PromptId, file: NewFile) -> FileAttachment {
    self.last_file_id += 1;
    let record = FileAttachment {
      id: FileId(self.last_file_id),
      prompt_id,
      name: file.name,
      mime_type: file.mime_type,
      data: file.data,
      created_at: Utc::now(),
    };
    self.files.insert(record.id, record.clone());
    record
  }

  fn insert_example(&mut self, prompt_id: PromptId, example: NewExample) -> Example {
    self.last_example_id += 1;
    let record = Example {
      id: ExampleId(self.last_example_id),
      prompt_id,
      input: example.input,
      output: example.output,
      created_at: Utc::now(),
    };
    self.examples.insert(record.id, record.clone());
    record
  }

  fn require_prompt(&self, id: PromptId) -> Result<&Prompt> {
    self.prompts.get(&id).ok_or(Error::PromptNotFound(id))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A prompt store that lives entirely in memory.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
    self
      .tables
      .lock()
      .map_err(|_| Error::Storage("memory store lock poisoned".into()))
  }

  /// Number of stored file attachments across all prompts.
  pub fn file_count(&self) -> Result<usize> { Ok(self.lock()?.files.len()) }

  /// Number of stored examples across all prompts.
  pub fn example_count(&self) -> Result<usize> { Ok(self.lock()?.examples.len()) }
}

// ─── PromptStore impl ────────────────────────────────────────────────────────

impl PromptStore for MemoryStore {
  type Error = Error;

  async fn create_prompt(&self, draft: NewPrompt) -> Result<PromptId> {
    let mut tables = self.lock()?;

    tables.last_prompt_id += 1;
    let id = PromptId(tables.last_prompt_id);
    let now = Utc::now();

    tables.prompts.insert(id, Prompt {
      id,
      title: draft.title,
      content: draft.content,
      tags: draft.tags,
      created_at: now,
      updated_at: now,
    });
    for file in draft.files {
      tables.insert_file(id, file);
    }
    for example in draft.examples {
      tables.insert_example(id, example);
    }

    debug!(%id, "created prompt");
    Ok(id)
  }

  async fn get_prompt(&self, id: PromptId) -> Result<PromptDetail> {
    let tables = self.lock()?;
    let prompt = tables.require_prompt(id)?.clone();

    let files = tables
      .files
      .values()
      .filter(|f| f.prompt_id == id)
      .cloned()
      .collect();
    let examples = tables
      .examples
      .values()
      .filter(|e| e.prompt_id == id)
      .cloned()
      .collect();

    Ok(PromptDetail { prompt, files, examples })
  }

  async fn update_prompt(&self, id: PromptId, update: PromptUpdate) -> Result<Prompt> {
    let mut tables = self.lock()?;
    let prompt = tables
      .prompts
      .get_mut(&id)
      .ok_or(Error::PromptNotFound(id))?;

    update.apply(prompt);
    debug!(%id, "updated prompt");
    Ok(prompt.clone())
  }

  async fn delete_prompt(&self, id: PromptId) -> Result<()> {
    let mut tables = self.lock()?;
    tables.files.retain(|_, f| f.prompt_id != id);
    tables.examples.retain(|_, e| e.prompt_id != id);
    if tables.prompts.remove(&id).is_some() {
      debug!(%id, "deleted prompt");
    }
    Ok(())
  }

  async fn get_all_prompts(&self) -> Result<Vec<Prompt>> {
    Ok(self.lock()?.prompts.values().cloned().collect())
  }

  async fn search_prompts(&self, query: &PromptQuery) -> Result<Vec<Prompt>> {
    Ok(
      self
        .lock()?
        .prompts
        .values()
        .filter(|p| query.matches(p))
        .cloned()
        .collect(),
    )
  }

  async fn attach_file(&self, id: PromptId, file: NewFile) -> Result<FileAttachment> {
    let mut tables = self.lock()?;
    tables.require_prompt(id)?;
    Ok(tables.insert_file(id, file))
  }

  async fn add_example(&self, id: PromptId, example: NewExample) -> Result<Example> {
    let mut tables = self.lock()?;
    tables.require_prompt(id)?;
    Ok(tables.insert_example(id, example))
  }
}

// ─── SettingsStore impl ──────────────────────────────────────────────────────

impl SettingsStore for MemoryStore {
  type Error = Error;

  async fn load_settings(&self) -> Result<Option<Settings>> {
    Ok(self.lock()?.settings)
  }

  async fn save_settings(&self, settings: Settings) -> Result<()> {
    self.lock()?.settings = Some(settings);
    Ok(())
  }
}
