//! The application shell: owns the store handle, the bus and the router, and
//! keeps exactly one view mounted for the current route.

use std::{mem, sync::Arc};

use prompts_core::store::{PromptStore, SettingsStore};
use tracing::debug;

use crate::{
  events::{AppEvent, EventBus, Subscription, Topic},
  route::{Route, Section},
  router::Router,
  views::{PromptEditorView, PromptListView, SettingsPanel},
};

/// Events the shell turns into navigation, plus route announcements.
const SHELL_TOPICS: [Topic; 6] = [
  Topic::Navigate,
  Topic::CreatePrompt,
  Topic::EditPrompt,
  Topic::PromptSaved,
  Topic::CancelEdit,
  Topic::RouteChanged,
];

/// The mounted view.
pub enum View<S> {
  PromptList(PromptListView<S>),
  Editor(PromptEditorView<S>),
  Analytics,
  Testing,
  Settings(SettingsPanel<S>),
}

impl<S> View<S> {
  pub fn section(&self) -> Section {
    match self {
      Self::PromptList(_) => Section::PromptsList,
      Self::Editor(_) => Section::Editor,
      Self::Analytics => Section::Analytics,
      Self::Testing => Section::Testing,
      Self::Settings(_) => Section::Settings,
    }
  }
}

impl<S: PromptStore> View<S> {
  fn unmount(self) {
    if let Self::PromptList(list) = self {
      list.unmount();
    }
  }
}

pub struct Shell<S> {
  store:        Arc<S>,
  bus:          EventBus,
  router:       Router,
  subscription: Subscription,
  view:         View<S>,
}

impl<S: PromptStore + SettingsStore> Shell<S> {
  /// Start at `initial_address` with the view it resolves to.
  pub async fn new(store: Arc<S>, initial_address: impl Into<String>) -> Self {
    let bus = EventBus::new();
    let subscription = bus.subscribe(&SHELL_TOPICS);
    let router = Router::new(initial_address, bus.clone());
    let view = mount(&store, &bus, router.current()).await;
    let mut shell = Self { store, bus, router, subscription, view };
    shell.sync_address();
    shell
  }

  /// Apply every pending event: route requests go to the router, and a route
  /// change remounts the view. Otherwise the mounted view gets to react to
  /// its own subscriptions. Returns the number of shell events handled.
  pub async fn pump(&mut self) -> usize {
    let mut handled = 0;
    let mut route_changed = false;

    // Routing publishes `RouteChanged` back onto our subscription, so drain
    // until quiet.
    loop {
      let events = self.subscription.drain();
      if events.is_empty() {
        break;
      }
      for event in events {
        handled += 1;
        match event {
          AppEvent::RouteChanged(_) => route_changed = true,
          other => {
            self.router.handle(&other);
          }
        }
      }
    }

    if route_changed {
      self.remount().await;
    } else if let View::PromptList(list) = &mut self.view {
      list.process_events().await;
    }
    handled
  }

  async fn remount(&mut self) {
    let route = self.router.current();
    debug!(%route, "mounting view");
    mem::replace(&mut self.view, View::Analytics).unmount();
    self.view = mount(&self.store, &self.bus, route).await;
    self.sync_address();
  }

  /// An editor whose load failed holds a blank create form.
  fn sync_address(&mut self) {
    if let (Route::Editor(Some(_)), View::Editor(editor)) = (self.router.current(), &self.view)
      && editor.is_new()
    {
      self.router.replace(Route::Editor(None));
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  pub async fn navigate(&mut self, route: Route) {
    self.router.navigate(route);
    self.pump().await;
  }

  pub async fn navigate_to_address(&mut self, address: &str) {
    self.router.navigate_to_address(address);
    self.pump().await;
  }

  /// Returns `false` at the start of the history.
  pub async fn back(&mut self) -> bool {
    let moved = self.router.back().is_some();
    self.pump().await;
    moved
  }

  /// Returns `false` at the end of the history.
  pub async fn forward(&mut self) -> bool {
    let moved = self.router.forward().is_some();
    self.pump().await;
    moved
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn route(&self) -> Route { self.router.current() }

  pub fn section(&self) -> Section { self.view.section() }

  pub fn title(&self) -> &'static str { self.route().title() }

  pub fn document_title(&self) -> String { self.route().document_title() }

  pub fn view(&self) -> &View<S> { &self.view }

  pub fn view_mut(&mut self) -> &mut View<S> { &mut self.view }

  pub fn router(&self) -> &Router { &self.router }

  pub fn bus(&self) -> &EventBus { &self.bus }
}

async fn mount<S>(store: &Arc<S>, bus: &EventBus, route: Route) -> View<S>
where
  S: PromptStore + SettingsStore,
{
  let store = Arc::clone(store);
  let bus = bus.clone();
  match route {
    Route::PromptsList => View::PromptList(PromptListView::mount(store, bus).await),
    Route::Editor(id) => View::Editor(PromptEditorView::mount(store, bus, id).await),
    Route::Analytics => View::Analytics,
    Route::Testing => View::Testing,
    Route::Settings => View::Settings(SettingsPanel::mount(store, bus).await),
  }
}

#[cfg(test)]
mod tests {
  use prompts_core::{
    memory::MemoryStore,
    prompt::{NewPrompt, PromptId},
  };

  use super::*;
  use crate::views::{EditorStatus, ListDisplay};

  fn assert_consistent(shell: &Shell<MemoryStore>) {
    assert_eq!(shell.section(), shell.router().current().section());
  }

  #[tokio::test]
  async fn unknown_address_shows_list() {
    let shell = Shell::new(Arc::new(MemoryStore::new()), "/nonsense").await;
    assert_eq!(shell.section(), Section::PromptsList);
    assert_eq!(shell.title(), "Prompt Management");
    assert!(matches!(shell.view(), View::PromptList(l) if l.display() == ListDisplay::Empty));
  }

  #[tokio::test]
  async fn editor_address_populates_editor() {
    let store = Arc::new(MemoryStore::new());
    for n in 1..=123 {
      store
        .create_prompt(NewPrompt::new(format!("Prompt {n}"), "body"))
        .await
        .unwrap();
    }

    let shell = Shell::new(store, "/editor?id=123").await;
    assert_eq!(shell.title(), "Edit Prompt");
    assert_eq!(shell.document_title(), "Prompts AI - Edit Prompt");
    let View::Editor(editor) = shell.view() else {
      panic!("expected the editor to be mounted");
    };
    assert_eq!(editor.status(), EditorStatus::Populated);
    assert_eq!(editor.prompt_id(), Some(PromptId(123)));
  }

  #[tokio::test]
  async fn failed_editor_load_rewrites_address() {
    let mut shell = Shell::new(Arc::new(MemoryStore::new()), "/editor?id=9").await;
    assert_eq!(shell.router().address(), "/editor");
    assert_eq!(shell.title(), "Create Prompt");
    let View::Editor(editor) = shell.view() else { panic!("expected editor") };
    assert!(editor.is_new());
    assert_eq!(editor.notice(), Some("Failed to load prompt"));

    shell.navigate(Route::Settings).await;
    shell.navigate(Route::Editor(Some(PromptId(7)))).await;
    assert_eq!(shell.document_title(), "Prompts AI - Create Prompt");
    assert!(shell.back().await);
    assert_eq!(shell.section(), Section::Settings);
  }

  #[tokio::test]
  async fn one_section_visible_across_navigation() {
    let mut shell = Shell::new(Arc::new(MemoryStore::new()), "/").await;
    assert_consistent(&shell);

    for section in Section::NAVIGABLE.into_iter().rev() {
      shell.bus().publish(AppEvent::Navigate(section));
      shell.pump().await;
      assert_eq!(shell.section(), section);
      assert_consistent(&shell);
    }

    shell.navigate(Route::Editor(None)).await;
    assert_consistent(&shell);
    shell.navigate_to_address("#settings").await;
    assert_eq!(shell.section(), Section::Settings);

    while shell.back().await {
      assert_consistent(&shell);
    }
    assert_eq!(shell.route(), Route::PromptsList);
    while shell.forward().await {
      assert_consistent(&shell);
    }
    assert_eq!(shell.section(), Section::Settings);
  }

  #[tokio::test]
  async fn create_save_returns_to_refreshed_list() {
    let mut shell = Shell::new(Arc::new(MemoryStore::new()), "/prompts").await;

    let View::PromptList(list) = shell.view() else { panic!("expected list") };
    list.create();
    shell.pump().await;

    let View::Editor(editor) = shell.view_mut() else { panic!("expected editor") };
    assert!(editor.is_new());
    editor.set_title("Greeting");
    editor.set_content("Say hello");
    editor.save().await.unwrap();
    shell.pump().await;

    let View::PromptList(list) = shell.view() else { panic!("expected list") };
    assert_eq!(list.prompts().len(), 1);
    assert_eq!(shell.router().address(), "/prompts");
  }

  #[tokio::test]
  async fn cancel_edit_returns_to_list() {
    let mut shell = Shell::new(Arc::new(MemoryStore::new()), "/editor").await;
    let View::Editor(editor) = shell.view() else { panic!("expected editor") };
    editor.cancel();
    shell.pump().await;
    assert_eq!(shell.section(), Section::PromptsList);
  }

  #[tokio::test]
  async fn delete_refreshes_list_in_place() {
    let store = Arc::new(MemoryStore::new());
    store.create_prompt(NewPrompt::new("A", "a")).await.unwrap();
    let mut shell = Shell::new(store, "/prompts").await;

    let View::PromptList(list) = shell.view_mut() else { panic!("expected list") };
    list.request_delete(PromptId(1));
    assert!(list.confirm_delete(std::time::Instant::now()).await);
    shell.pump().await;

    assert_eq!(shell.section(), Section::PromptsList);
    let View::PromptList(list) = shell.view() else { panic!("expected list") };
    assert_eq!(list.display(), ListDisplay::Empty);
  }
}
