//! A [`MemoryStore`] wrapper whose reads or writes can be switched to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use prompts_core::{
  Error, Result,
  memory::MemoryStore,
  prompt::{
    Example, FileAttachment, NewExample, NewFile, NewPrompt, Prompt,
    PromptDetail, PromptId, PromptUpdate,
  },
  query::PromptQuery,
  settings::Settings,
  store::{PromptStore, SettingsStore},
};

pub struct FlakyStore {
  inner:          MemoryStore,
  fail_reads:     AtomicBool,
  fail_writes:    AtomicBool,
  /// `attach_file` calls left before it starts failing.
  attach_allowed: AtomicUsize,
}

impl FlakyStore {
  pub fn new() -> Self {
    Self {
      inner:          MemoryStore::new(),
      fail_reads:     AtomicBool::new(false),
      fail_writes:    AtomicBool::new(false),
      attach_allowed: AtomicUsize::new(usize::MAX),
    }
  }

  /// Let the next `n` `attach_file` calls through and fail the rest.
  pub fn allow_attachments(&self, n: usize) { self.attach_allowed.store(n, Ordering::SeqCst); }

  pub fn fail_reads(&self, fail: bool) { self.fail_reads.store(fail, Ordering::SeqCst); }

  pub fn fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst); }

  fn read(&self) -> Result<()> {
    match self.fail_reads.load(Ordering::SeqCst) {
      true => Err(Error::Storage("read refused".into())),
      false => Ok(()),
    }
  }

  fn write(&self) -> Result<()> {
    match self.fail_writes.load(Ordering::SeqCst) {
      true => Err(Error::Storage("write refused".into())),
      false => Ok(()),
    }
  }
}

impl PromptStore for FlakyStore {
  type Error = Error;

  async fn create_prompt(&self, draft: NewPrompt) -> Result<PromptId> {
    self.write()?;
    self.inner.create_prompt(draft).await
  }

  async fn get_prompt(&self, id: PromptId) -> Result<PromptDetail> {
    self.read()?;
    self.inner.get_prompt(id).await
  }

  async fn update_prompt(&self, id: PromptId, update: PromptUpdate) -> Result<Prompt> {
    self.write()?;
    self.inner.update_prompt(id, update).await
  }

  async fn delete_prompt(&self, id: PromptId) -> Result<()> {
    self.write()?;
    self.inner.delete_prompt(id).await
  }

  async fn get_all_prompts(&self) -> Result<Vec<Prompt>> {
    self.read()?;
    self.inner.get_all_prompts().await
  }

  async fn search_prompts(&self, query: &PromptQuery) -> Result<Vec<Prompt>> {
    self.read()?;
    self.inner.search_prompts(query).await
  }

  async fn attach_file(&self, id: PromptId, file: NewFile) -> Result<FileAttachment> {
    self.write()?;
    self
      .attach_allowed
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
      .map_err(|_| Error::Storage("attachment refused".into()))?;
    self.inner.attach_file(id, file).await
  }

  async fn add_example(&self, id: PromptId, example: NewExample) -> Result<Example> {
    self.write()?;
    self.inner.add_example(id, example).await
  }
}

impl SettingsStore for FlakyStore {
  type Error = Error;

  async fn load_settings(&self) -> Result<Option<Settings>> {
    self.read()?;
    self.inner.load_settings().await
  }

  async fn save_settings(&self, settings: Settings) -> Result<()> {
    self.write()?;
    self.inner.save_settings(settings).await
  }
}
