//! The prompt editor: a form for creating a prompt or editing an existing one,
//! with pending file attachments and examples.

use std::sync::Arc;

use prompts_core::{
  prompt::{
    Example, FileAttachment, NewExample, NewFile, NewPrompt, PromptId,
    PromptUpdate,
  },
  store::PromptStore,
};
use tracing::{debug, warn};

use crate::{
  Error, Result, ValidationError,
  events::{AppEvent, EventBus},
};

const LOAD_FAILED: &str = "Failed to load prompt";
const SAVE_FAILED: &str = "Failed to save prompt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
  /// A blank form for a new prompt.
  Empty,
  /// Fetching an existing prompt. Like `Saving`, only held while the
  /// corresponding call is pending.
  Loading(PromptId),
  /// The form holds the stored prompt, unchanged.
  Populated,
  /// The form has unsaved changes.
  Dirty,
  Saving,
  Saved,
}

pub struct PromptEditorView<S> {
  store:     Arc<S>,
  bus:       EventBus,
  prompt_id: Option<PromptId>,
  status:    EditorStatus,

  title:     String,
  content:   String,
  tags:      Vec<String>,
  tag_input: String,

  files:    Vec<FileAttachment>,
  examples: Vec<Example>,

  // Added in this session, written on the next save.
  new_files:            Vec<NewFile>,
  new_examples:         Vec<NewExample>,
  pending_file_removal: Option<usize>,

  notice: Option<String>,
}

impl<S: PromptStore> PromptEditorView<S> {
  /// Open a blank form, or load `id` into the form.
  pub async fn mount(store: Arc<S>, bus: EventBus, id: Option<PromptId>) -> Self {
    let mut view = Self::blank(store, bus);
    if let Some(id) = id {
      view.load(id).await;
    }
    view
  }

  fn blank(store: Arc<S>, bus: EventBus) -> Self {
    Self {
      store,
      bus,
      prompt_id: None,
      status: EditorStatus::Empty,
      title: String::new(),
      content: String::new(),
      tags: Vec::new(),
      tag_input: String::new(),
      files: Vec::new(),
      examples: Vec::new(),
      new_files: Vec::new(),
      new_examples: Vec::new(),
      pending_file_removal: None,
      notice: None,
    }
  }

  /// Replace the form with the stored prompt `id`. On failure the form is
  /// left blank and an error notice is shown.
  pub async fn load(&mut self, id: PromptId) {
    self.status = EditorStatus::Loading(id);

    match self.store.get_prompt(id).await {
      Ok(detail) => {
        self.prompt_id = Some(id);
        self.title = detail.prompt.title;
        self.content = detail.prompt.content;
        self.tags = detail.prompt.tags;
        self.files = detail.files;
        self.examples = detail.examples;
        self.tag_input.clear();
        self.new_files.clear();
        self.new_examples.clear();
        self.pending_file_removal = None;
        self.notice = None;
        self.status = EditorStatus::Populated;
        debug!(%id, "editor populated");
      }
      Err(e) => {
        warn!(error = %e, %id, "loading prompt failed");
        *self = Self::blank(Arc::clone(&self.store), self.bus.clone());
        self.notice = Some(LOAD_FAILED.into());
      }
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn status(&self) -> EditorStatus { self.status }

  /// `None` while creating a new prompt.
  pub fn prompt_id(&self) -> Option<PromptId> { self.prompt_id }

  pub fn is_new(&self) -> bool { self.prompt_id.is_none() }

  pub fn title(&self) -> &str { &self.title }

  pub fn content(&self) -> &str { &self.content }

  pub fn tags(&self) -> &[String] { &self.tags }

  pub fn tag_input(&self) -> &str { &self.tag_input }

  pub fn files(&self) -> &[FileAttachment] { &self.files }

  pub fn examples(&self) -> &[Example] { &self.examples }

  pub fn new_files(&self) -> &[NewFile] { &self.new_files }

  pub fn new_examples(&self) -> &[NewExample] { &self.new_examples }

  /// The current error notice, if any.
  pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }

  pub fn dismiss_notice(&mut self) { self.notice = None; }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn set_title(&mut self, title: impl Into<String>) {
    self.title = title.into();
    self.mark_dirty();
  }

  pub fn set_content(&mut self, content: impl Into<String>) {
    self.content = content.into();
    self.mark_dirty();
  }

  pub fn set_tag_input(&mut self, input: impl Into<String>) { self.tag_input = input.into(); }

  /// Add the trimmed tag input as a tag and clear the input. Returns `false`
  /// if the input was blank.
  pub fn commit_tag(&mut self) -> bool {
    let tag = self.tag_input.trim();
    if tag.is_empty() {
      return false;
    }
    self.tags.push(tag.to_owned());
    self.tag_input.clear();
    self.mark_dirty();
    true
  }

  /// Remove every tag equal to `tag`.
  pub fn remove_tag(&mut self, tag: &str) {
    let before = self.tags.len();
    self.tags.retain(|t| t != tag);
    if self.tags.len() != before {
      self.mark_dirty();
    }
  }

  // ── Files & examples ──────────────────────────────────────────────────────

  pub fn attach_file(&mut self, file: NewFile) {
    self.new_files.push(file);
    self.mark_dirty();
  }

  /// Open the confirmation modal for removing the pending file at `index`.
  pub fn request_file_removal(&mut self, index: usize) {
    if index < self.new_files.len() {
      self.pending_file_removal = Some(index);
    }
  }

  /// The pending file awaiting removal confirmation.
  pub fn pending_file_removal(&self) -> Option<&NewFile> {
    self.new_files.get(self.pending_file_removal?)
  }

  pub fn cancel_file_removal(&mut self) { self.pending_file_removal = None; }

  pub fn confirm_file_removal(&mut self) -> Option<NewFile> {
    let index = self.pending_file_removal.take()?;
    (index < self.new_files.len()).then(|| {
      self.mark_dirty();
      self.new_files.remove(index)
    })
  }

  /// Queue an example. Returns `false` if both sides are blank.
  pub fn add_example(&mut self, input: impl Into<String>, output: impl Into<String>) -> bool {
    let example = NewExample { input: input.into(), output: output.into() };
    if example.input.trim().is_empty() && example.output.trim().is_empty() {
      return false;
    }
    self.new_examples.push(example);
    self.mark_dirty();
    true
  }

  fn mark_dirty(&mut self) { self.status = EditorStatus::Dirty; }

  // ── Save ──────────────────────────────────────────────────────────────────

  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.title.trim().is_empty() {
      return Err(ValidationError::EmptyTitle);
    }
    if self.content.trim().is_empty() {
      return Err(ValidationError::EmptyContent);
    }
    Ok(())
  }

  pub fn can_save(&self) -> bool { self.validate().is_ok() }

  /// Write the form to the store and announce it. Validation failures never
  /// reach the store.
  pub async fn save(&mut self) -> Result<PromptId> {
    self.validate()?;

    self.status = EditorStatus::Saving;
    self.notice = None;

    match self.persist().await {
      Ok(id) => {
        self.prompt_id = Some(id);
        self.status = EditorStatus::Saved;
        self.bus.publish(AppEvent::PromptSaved(id));
        Ok(id)
      }
      Err(e) => {
        warn!(error = %e, id = ?self.prompt_id, "saving prompt failed");
        self.status = EditorStatus::Dirty;
        self.notice = Some(format!("{SAVE_FAILED}: {e}"));
        Err(Error::store(e))
      }
    }
  }

  async fn persist(&mut self) -> Result<PromptId, S::Error> {
    let store = Arc::clone(&self.store);

    let Some(id) = self.prompt_id else {
      let draft = NewPrompt {
        title:    self.title.clone(),
        content:  self.content.clone(),
        tags:     self.tags.clone(),
        files:    self.new_files.clone(),
        examples: self.new_examples.clone(),
      };
      let id = store.create_prompt(draft).await?;
      self.new_files.clear();
      self.new_examples.clear();
      match store.get_prompt(id).await {
        Ok(detail) => {
          self.files = detail.files;
          self.examples = detail.examples;
        }
        Err(e) => warn!(error = %e, %id, "re-reading saved prompt failed"),
      }
      return Ok(id);
    };

    store
      .update_prompt(id, PromptUpdate {
        title:   Some(self.title.clone()),
        content: Some(self.content.clone()),
        tags:    Some(self.tags.clone()),
      })
      .await?;

    // Dependents are moved out one at a time so a retry after a partial
    // failure does not write them twice.
    while let Some(file) = self.new_files.first().cloned() {
      let saved = store.attach_file(id, file).await?;
      self.new_files.remove(0);
      self.files.push(saved);
    }
    while let Some(example) = self.new_examples.first().cloned() {
      let saved = store.add_example(id, example).await?;
      self.new_examples.remove(0);
      self.examples.push(saved);
    }
    Ok(id)
  }

  /// Leave the editor without saving.
  pub fn cancel(&self) { self.bus.publish(AppEvent::CancelEdit); }
}

#[cfg(test)]
mod tests {
  use prompts_core::memory::MemoryStore;

  use super::*;
  use crate::{events::Topic, test_support::FlakyStore};

  fn file(name: &str) -> NewFile {
    NewFile {
      name:      name.into(),
      mime_type: "text/plain".into(),
      data:      b"data".to_vec(),
    }
  }

  #[tokio::test]
  async fn new_editor_starts_empty() {
    let view = PromptEditorView::mount(Arc::new(MemoryStore::new()), EventBus::new(), None).await;
    assert_eq!(view.status(), EditorStatus::Empty);
    assert!(view.is_new());
    assert!(!view.can_save());
  }

  #[tokio::test]
  async fn existing_prompt_populates_form() {
    let store = Arc::new(MemoryStore::new());
    for n in 1..=123 {
      store
        .create_prompt(NewPrompt::new(format!("Prompt {n}"), "body").with_tags(["t"]))
        .await
        .unwrap();
    }

    let view = PromptEditorView::mount(store, EventBus::new(), Some(PromptId(123))).await;
    assert_eq!(view.status(), EditorStatus::Populated);
    assert_eq!(view.prompt_id(), Some(PromptId(123)));
    assert_eq!(view.title(), "Prompt 123");
    assert_eq!(view.tags(), ["t"]);
  }

  #[tokio::test]
  async fn failed_load_leaves_blank_form_with_notice() {
    let view =
      PromptEditorView::mount(Arc::new(MemoryStore::new()), EventBus::new(), Some(PromptId(9))).await;
    assert_eq!(view.status(), EditorStatus::Empty);
    assert_eq!(view.title(), "");
    assert_eq!(view.notice(), Some("Failed to load prompt"));
  }

  #[tokio::test]
  async fn invalid_form_never_reaches_store() {
    let store = Arc::new(MemoryStore::new());
    let mut view = PromptEditorView::mount(store.clone(), EventBus::new(), None).await;

    view.set_title("   ");
    view.set_content("body");
    assert!(matches!(
      view.save().await,
      Err(Error::Validation(ValidationError::EmptyTitle))
    ));

    view.set_title("Title");
    view.set_content("\n");
    assert!(matches!(
      view.save().await,
      Err(Error::Validation(ValidationError::EmptyContent))
    ));

    assert!(store.get_all_prompts().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn tags_add_on_commit_and_remove_all_equal() {
    let mut view = PromptEditorView::mount(Arc::new(MemoryStore::new()), EventBus::new(), None).await;

    view.set_tag_input("  ai  ");
    assert!(view.commit_tag());
    view.set_tag_input("code");
    view.commit_tag();
    view.set_tag_input("ai");
    view.commit_tag();
    view.set_tag_input("   ");
    assert!(!view.commit_tag());

    assert_eq!(view.tags(), ["ai", "code", "ai"]);
    assert_eq!(view.tag_input(), "");

    view.remove_tag("ai");
    assert_eq!(view.tags(), ["code"]);
    assert_eq!(view.status(), EditorStatus::Dirty);
  }

  #[tokio::test]
  async fn saving_new_prompt_creates_and_announces() {
    let store = Arc::new(MemoryStore::new());
    let bus = EventBus::new();
    let mut saved = bus.subscribe(&[Topic::PromptSaved]);
    let mut view = PromptEditorView::mount(store.clone(), bus, None).await;

    view.set_title("Summarise");
    view.set_content("Summarise the text");
    view.attach_file(file("a.txt"));
    view.add_example("long text", "short text");

    let id = view.save().await.unwrap();
    assert_eq!(id, PromptId(1));
    assert_eq!(view.status(), EditorStatus::Saved);
    assert_eq!(saved.drain(), [AppEvent::PromptSaved(id)]);

    let detail = store.get_prompt(id).await.unwrap();
    assert_eq!(detail.files.len(), 1);
    assert_eq!(detail.examples.len(), 1);
    assert_eq!(view.files().len(), 1);
    assert!(view.new_files().is_empty());
  }

  #[tokio::test]
  async fn saving_existing_prompt_updates_and_appends() {
    let store = Arc::new(MemoryStore::new());
    let id = store
      .create_prompt(NewPrompt::new("Old", "body").with_tags(["x"]))
      .await
      .unwrap();

    let mut view = PromptEditorView::mount(store.clone(), EventBus::new(), Some(id)).await;
    view.set_title("New");
    view.add_example("in", "out");
    assert_eq!(view.save().await.unwrap(), id);

    let detail = store.get_prompt(id).await.unwrap();
    assert_eq!(detail.prompt.title, "New");
    assert_eq!(detail.prompt.tags, ["x"]);
    assert_eq!(detail.examples.len(), 1);
    assert_eq!(store.get_all_prompts().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn failed_save_returns_to_dirty() {
    let store = Arc::new(FlakyStore::new());
    store.fail_writes(true);
    let bus = EventBus::new();
    let mut saved = bus.subscribe(&[Topic::PromptSaved]);
    let mut view = PromptEditorView::mount(store.clone(), bus, None).await;

    view.set_title("T");
    view.set_content("C");
    assert!(matches!(view.save().await, Err(Error::Store(_))));
    assert_eq!(view.status(), EditorStatus::Dirty);
    assert!(view.notice().unwrap().starts_with("Failed to save prompt"));
    assert!(saved.drain().is_empty());

    store.fail_writes(false);
    assert!(view.save().await.is_ok());
    assert!(view.notice().is_none());
  }

  #[tokio::test]
  async fn failed_reload_clears_previous_prompt() {
    let store = Arc::new(MemoryStore::new());
    let id = store
      .create_prompt(NewPrompt::new("Secret", "old body").with_tags(["t"]))
      .await
      .unwrap();
    let mut view = PromptEditorView::mount(store.clone(), EventBus::new(), Some(id)).await;
    view.attach_file(file("a.txt"));
    view.add_example("in", "out");
    view.request_file_removal(0);

    view.load(PromptId(999)).await;
    assert_eq!(view.status(), EditorStatus::Empty);
    assert!(view.is_new());
    assert_eq!(view.title(), "");
    assert_eq!(view.content(), "");
    assert!(view.tags().is_empty());
    assert!(view.new_files().is_empty());
    assert!(view.new_examples().is_empty());
    assert!(view.pending_file_removal().is_none());
    assert_eq!(view.notice(), Some("Failed to load prompt"));
    assert!(!view.can_save());

    assert_eq!(store.get_all_prompts().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn retry_after_partial_save_writes_each_dependent_once() {
    let store = Arc::new(FlakyStore::new());
    let id = store.create_prompt(NewPrompt::new("T", "C")).await.unwrap();
    let mut view = PromptEditorView::mount(store.clone(), EventBus::new(), Some(id)).await;
    view.attach_file(file("a.txt"));
    view.attach_file(file("b.txt"));
    view.add_example("in", "out");

    store.allow_attachments(1);
    assert!(view.save().await.is_err());
    assert_eq!(view.files().len(), 1);
    assert_eq!(view.new_files().len(), 1);
    assert_eq!(view.new_files()[0].name, "b.txt");

    store.allow_attachments(usize::MAX);
    assert_eq!(view.save().await.unwrap(), id);

    let detail = store.get_prompt(id).await.unwrap();
    let names: Vec<_> = detail.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["a.txt", "b.txt"]);
    assert_eq!(detail.examples.len(), 1);
    assert!(view.new_files().is_empty());
    assert!(view.new_examples().is_empty());
  }

  #[tokio::test]
  async fn file_removal_needs_confirmation() {
    let mut view = PromptEditorView::mount(Arc::new(MemoryStore::new()), EventBus::new(), None).await;
    view.attach_file(file("a.txt"));
    view.attach_file(file("b.txt"));

    view.request_file_removal(0);
    assert_eq!(view.pending_file_removal().map(|f| f.name.as_str()), Some("a.txt"));
    view.cancel_file_removal();
    assert_eq!(view.new_files().len(), 2);

    view.request_file_removal(1);
    assert_eq!(view.confirm_file_removal().map(|f| f.name), Some("b.txt".into()));
    assert_eq!(view.new_files().len(), 1);
    assert!(view.confirm_file_removal().is_none());
  }

  #[tokio::test]
  async fn cancel_announces() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe(&[Topic::CancelEdit]);
    let view = PromptEditorView::mount(Arc::new(MemoryStore::new()), bus, None).await;
    view.cancel();
    assert_eq!(sub.drain(), [AppEvent::CancelEdit]);
  }
}
