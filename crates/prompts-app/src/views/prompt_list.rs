//! The prompt list: a grid of prompt cards with filtering and confirmed
//! deletion.

use std::{sync::Arc, time::Instant};

use prompts_core::{
  prompt::{Prompt, PromptId},
  query::PromptQuery,
  store::PromptStore,
};
use tracing::warn;

use super::{DELETE_ERROR_TTL, Flash, visible};
use crate::events::{AppEvent, EventBus, Subscription, Topic};

const LOAD_FAILED: &str = "Failed to load prompts";
const DELETE_FAILED: &str = "Failed to delete prompt";

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
  Loading,
  Failed(String),
  Loaded(Vec<Prompt>),
}

/// What the list renders. Exactly one variant applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay<'a> {
  Loading,
  Error(&'a str),
  Empty,
  Grid(&'a [Prompt]),
}

pub struct PromptListView<S> {
  store:          Arc<S>,
  bus:            EventBus,
  subscription:   Subscription,
  state:          LoadState,
  filter:         String,
  cursor:         usize,
  pending_delete: Option<PromptId>,
  flash:          Option<Flash>,
}

impl<S: PromptStore> PromptListView<S> {
  /// Subscribe for save/delete notifications and load the prompts.
  pub async fn mount(store: Arc<S>, bus: EventBus) -> Self {
    let subscription = bus.subscribe(&[Topic::PromptSaved, Topic::PromptDeleted]);
    let mut view = Self {
      store,
      bus,
      subscription,
      state: LoadState::Loading,
      filter: String::new(),
      cursor: 0,
      pending_delete: None,
      flash: None,
    };
    view.reload().await;
    view
  }

  /// Release the bus subscription.
  pub fn unmount(self) { self.bus.unsubscribe(self.subscription); }

  // ── Data ──────────────────────────────────────────────────────────────────

  /// Re-fetch prompts, honouring the current filter.
  pub async fn reload(&mut self) {
    let query = PromptQuery::parse(&self.filter);
    let result = if query.is_empty() {
      self.store.get_all_prompts().await
    } else {
      self.store.search_prompts(&query).await
    };

    self.state = match result {
      Ok(prompts) => {
        self.cursor = self.cursor.min(prompts.len().saturating_sub(1));
        LoadState::Loaded(prompts)
      }
      Err(e) => {
        warn!(error = %e, "loading prompts failed");
        LoadState::Failed(LOAD_FAILED.into())
      }
    };
  }

  /// Refresh if a save or delete was announced since the last call.
  /// Returns `true` if the list was reloaded.
  pub async fn process_events(&mut self) -> bool {
    let events = self.subscription.drain();
    let stale = events
      .iter()
      .any(|e| matches!(e, AppEvent::PromptSaved(_) | AppEvent::PromptDeleted(_)));
    if stale {
      self.reload().await;
    }
    stale
  }

  pub fn display(&self) -> ListDisplay<'_> {
    match &self.state {
      LoadState::Loading => ListDisplay::Loading,
      LoadState::Failed(msg) => ListDisplay::Error(msg),
      LoadState::Loaded(prompts) if prompts.is_empty() => ListDisplay::Empty,
      LoadState::Loaded(prompts) => ListDisplay::Grid(prompts),
    }
  }

  pub fn prompts(&self) -> &[Prompt] {
    match &self.state {
      LoadState::Loaded(prompts) => prompts,
      LoadState::Loading | LoadState::Failed(_) => &[],
    }
  }

  // ── Filter ────────────────────────────────────────────────────────────────

  pub fn filter(&self) -> &str { &self.filter }

  /// Replace the filter line (`words #tag …`) and reload.
  pub async fn set_filter(&mut self, filter: impl Into<String>) {
    self.filter = filter.into();
    self.cursor = 0;
    self.reload().await;
  }

  // ── Cursor ────────────────────────────────────────────────────────────────

  pub fn cursor(&self) -> usize { self.cursor }

  pub fn selected(&self) -> Option<&Prompt> { self.prompts().get(self.cursor) }

  pub fn select_next(&mut self) {
    if self.cursor + 1 < self.prompts().len() {
      self.cursor += 1;
    }
  }

  pub fn select_prev(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Ask the router for a blank editor.
  pub fn create(&self) { self.bus.publish(AppEvent::CreatePrompt); }

  /// Ask the router to edit the selected prompt. Returns `false` when
  /// nothing is selected.
  pub fn open_selected(&self) -> bool {
    match self.selected() {
      Some(prompt) => {
        self.bus.publish(AppEvent::EditPrompt(prompt.id));
        true
      }
      None => false,
    }
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  /// Open the confirmation modal for `id`.
  pub fn request_delete(&mut self, id: PromptId) { self.pending_delete = Some(id); }

  pub fn request_delete_selected(&mut self) {
    if let Some(id) = self.selected().map(|p| p.id) {
      self.request_delete(id);
    }
  }

  /// The prompt awaiting confirmation, while the modal is open.
  pub fn pending_delete(&self) -> Option<&Prompt> {
    let id = self.pending_delete?;
    self.prompts().iter().find(|p| p.id == id)
  }

  pub fn is_confirming(&self) -> bool { self.pending_delete.is_some() }

  pub fn cancel_delete(&mut self) { self.pending_delete = None; }

  /// Delete the prompt awaiting confirmation, announce it, and re-fetch.
  /// On failure an error message is shown for three seconds. Returns `true`
  /// if the prompt was deleted.
  pub async fn confirm_delete(&mut self, now: Instant) -> bool {
    let Some(id) = self.pending_delete.take() else {
      return false;
    };

    match self.store.delete_prompt(id).await {
      Ok(()) => {
        self.bus.publish(AppEvent::PromptDeleted(id));
        self.reload().await;
        true
      }
      Err(e) => {
        warn!(error = %e, %id, "deleting prompt failed");
        self.flash = Some(Flash::new(DELETE_FAILED, DELETE_ERROR_TTL, now));
        false
      }
    }
  }

  /// The transient error message, if one is showing at `now`.
  pub fn flash(&self, now: Instant) -> Option<&str> { visible(&self.flash, now) }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use prompts_core::{memory::MemoryStore, prompt::NewPrompt};

  use super::*;
  use crate::test_support::FlakyStore;

  async fn seeded() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
      .create_prompt(NewPrompt::new("AI essay", "draft").with_tags(["writing"]))
      .await
      .unwrap();
    store
      .create_prompt(NewPrompt::new("Code review", "find bugs").with_tags(["code"]))
      .await
      .unwrap();
    store
  }

  #[tokio::test]
  async fn empty_store_shows_empty_view() {
    let view = PromptListView::mount(Arc::new(MemoryStore::new()), EventBus::new()).await;
    assert_eq!(view.display(), ListDisplay::Empty);
    assert!(view.selected().is_none());
  }

  #[tokio::test]
  async fn loaded_prompts_show_as_grid() {
    let view = PromptListView::mount(seeded().await, EventBus::new()).await;
    let ListDisplay::Grid(cards) = view.display() else {
      panic!("expected grid, got {:?}", view.display());
    };
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "AI essay");
  }

  #[tokio::test]
  async fn failed_fetch_shows_error_view() {
    let store = Arc::new(FlakyStore::new());
    store.fail_reads(true);
    let view = PromptListView::mount(store, EventBus::new()).await;
    assert_eq!(view.display(), ListDisplay::Error("Failed to load prompts"));
  }

  #[tokio::test]
  async fn filter_uses_search() {
    let mut view = PromptListView::mount(seeded().await, EventBus::new()).await;

    view.set_filter("ai #writing").await;
    assert_eq!(view.prompts().len(), 1);

    view.set_filter("#code").await;
    assert_eq!(view.prompts()[0].title, "Code review");

    view.set_filter("nothing matches").await;
    assert_eq!(view.display(), ListDisplay::Empty);
  }

  #[tokio::test]
  async fn create_and_open_publish_requests() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe(&[Topic::CreatePrompt, Topic::EditPrompt]);
    let mut view = PromptListView::mount(seeded().await, bus).await;

    view.create();
    view.select_next();
    assert!(view.open_selected());

    assert_eq!(sub.drain(), [AppEvent::CreatePrompt, AppEvent::EditPrompt(PromptId(2))]);
  }

  #[tokio::test]
  async fn delete_requires_confirmation() {
    let store = seeded().await;
    let bus = EventBus::new();
    let mut deleted = bus.subscribe(&[Topic::PromptDeleted]);
    let mut view = PromptListView::mount(store.clone(), bus).await;

    view.request_delete_selected();
    assert_eq!(view.pending_delete().map(|p| p.id), Some(PromptId(1)));
    view.cancel_delete();
    assert!(!view.is_confirming());
    assert_eq!(store.get_all_prompts().await.unwrap().len(), 2);

    view.request_delete(PromptId(1));
    assert!(view.confirm_delete(Instant::now()).await);
    assert_eq!(view.prompts().len(), 1);
    assert_eq!(deleted.drain(), [AppEvent::PromptDeleted(PromptId(1))]);
  }

  #[tokio::test]
  async fn failed_delete_flashes_for_three_seconds() {
    let store = Arc::new(FlakyStore::new());
    store
      .create_prompt(NewPrompt::new("Keep me", "body"))
      .await
      .unwrap();
    store.fail_writes(true);
    let mut view = PromptListView::mount(store, EventBus::new()).await;

    let now = Instant::now();
    view.request_delete(PromptId(1));
    assert!(!view.confirm_delete(now).await);

    assert_eq!(view.flash(now), Some("Failed to delete prompt"));
    assert_eq!(view.flash(now + Duration::from_secs(3)), None);
    assert_eq!(view.prompts().len(), 1);
  }

  #[tokio::test]
  async fn saved_notification_refreshes_list() {
    let store = Arc::new(MemoryStore::new());
    let bus = EventBus::new();
    let mut view = PromptListView::mount(store.clone(), bus.clone()).await;
    assert_eq!(view.display(), ListDisplay::Empty);

    let id = store.create_prompt(NewPrompt::new("New", "one")).await.unwrap();
    assert!(!view.process_events().await);

    bus.publish(AppEvent::PromptSaved(id));
    assert!(view.process_events().await);
    assert_eq!(view.prompts().len(), 1);
  }

  #[tokio::test]
  async fn unmount_releases_subscription() {
    let bus = EventBus::new();
    let view = PromptListView::mount(Arc::new(MemoryStore::new()), bus.clone()).await;
    assert_eq!(bus.subscriber_count(), 1);
    view.unmount();
    assert_eq!(bus.subscriber_count(), 0);
  }
}
