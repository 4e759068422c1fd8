//! The router: maps the current address to a [`Route`] and performs
//! navigation.
//!
//! The router keeps no route state of its own. [`Router::current`] re-parses
//! the history's current address on every call, so back/forward traversal
//! needs no bookkeeping beyond moving the history cursor.

use tracing::{debug, info};

use crate::{
  events::{AppEvent, EventBus},
  history::History,
  route::Route,
};

pub struct Router {
  history: History,
  bus:     EventBus,
}

impl Router {
  /// Start at `initial_address`, which may be unrecognised; it is kept as-is
  /// and resolves to the fallback route.
  pub fn new(initial_address: impl Into<String>, bus: EventBus) -> Self {
    Self { history: History::new(initial_address), bus }
  }

  pub fn current(&self) -> Route { Route::parse(self.history.location()) }

  pub fn address(&self) -> &str { self.history.location() }

  /// Push the canonical address of `route` and announce the change.
  pub fn navigate(&mut self, route: Route) -> Route {
    self.history.push(route.path());
    self.announce()
  }

  /// Overwrite the current address with the canonical address of `route`,
  /// without a history entry or an announcement. The mounted view already
  /// matches `route`.
  pub fn replace(&mut self, route: Route) {
    debug!(from = self.address(), to = %route, "replacing address");
    self.history.replace(route.path());
  }

  /// Navigate to a raw address, recognised or not.
  pub fn navigate_to_address(&mut self, address: &str) -> Route {
    self.history.push(address);
    self.announce()
  }

  /// Traverse one entry back. Returns the re-derived route, or `None` at the
  /// start of the history.
  pub fn back(&mut self) -> Option<Route> {
    self.history.back().then(|| self.announce())
  }

  /// Traverse one entry forward. Returns the re-derived route, or `None` at
  /// the end of the history.
  pub fn forward(&mut self) -> Option<Route> {
    self.history.forward().then(|| self.announce())
  }

  /// Apply the navigation implied by an application event, if any.
  pub fn handle(&mut self, event: &AppEvent) -> Option<Route> {
    let target = match event {
      AppEvent::Navigate(section) => section.route(),
      AppEvent::CreatePrompt => Route::Editor(None),
      AppEvent::EditPrompt(id) => Route::Editor(Some(*id)),
      AppEvent::PromptSaved(_) | AppEvent::CancelEdit => Route::PromptsList,
      AppEvent::PromptDeleted(_)
      | AppEvent::RouteChanged(_)
      | AppEvent::SettingsSaved(_) => return None,
    };
    debug!(?event, %target, "routing event");
    Some(self.navigate(target))
  }

  fn announce(&self) -> Route {
    let route = self.current();
    info!(address = self.address(), title = route.title(), "route changed");
    self.bus.publish(AppEvent::RouteChanged(route));
    route
  }
}

#[cfg(test)]
mod tests {
  use prompts_core::prompt::PromptId;

  use super::*;
  use crate::{events::Topic, route::Section};

  fn router() -> (Router, crate::events::Subscription) {
    let bus = EventBus::new();
    let sub = bus.subscribe(&[Topic::RouteChanged]);
    (Router::new("/", bus), sub)
  }

  #[test]
  fn starts_on_fallback_for_unknown_address() {
    let (r, _) = router();
    assert_eq!(r.current(), Route::PromptsList);

    let r = Router::new("/nonsense", EventBus::new());
    assert_eq!(r.current(), Route::PromptsList);
    assert_eq!(r.address(), "/nonsense");
  }

  #[test]
  fn navigate_updates_address_and_announces() {
    let (mut r, mut sub) = router();
    r.navigate(Route::Editor(Some(PromptId(123))));

    assert_eq!(r.address(), "/editor?id=123");
    assert_eq!(r.current().title(), "Edit Prompt");
    assert_eq!(sub.drain(), [AppEvent::RouteChanged(Route::Editor(Some(PromptId(123))))]);
  }

  #[test]
  fn back_and_forward_rederive_from_address() {
    let (mut r, mut sub) = router();
    r.handle(&AppEvent::CreatePrompt);
    r.handle(&AppEvent::CancelEdit);
    sub.drain();

    assert_eq!(r.back(), Some(Route::Editor(None)));
    assert_eq!(r.back(), Some(Route::PromptsList));
    assert_eq!(r.back(), None);
    assert_eq!(r.forward(), Some(Route::Editor(None)));
    assert_eq!(sub.drain().len(), 3);
  }

  #[test]
  fn events_map_to_routes() {
    let (mut r, _) = router();
    assert_eq!(r.handle(&AppEvent::Navigate(Section::Settings)), Some(Route::Settings));
    assert_eq!(
      r.handle(&AppEvent::EditPrompt(PromptId(4))),
      Some(Route::Editor(Some(PromptId(4))))
    );
    assert_eq!(r.handle(&AppEvent::PromptSaved(PromptId(4))), Some(Route::PromptsList));
    assert_eq!(r.handle(&AppEvent::PromptDeleted(PromptId(4))), None);
    assert_eq!(r.address(), "/prompts");
  }

  #[test]
  fn replace_is_silent_and_rederives() {
    let (mut r, mut sub) = router();
    r.navigate(Route::Editor(Some(PromptId(9))));
    sub.drain();

    r.replace(Route::Editor(None));
    assert_eq!(r.address(), "/editor");
    assert_eq!(r.current().title(), "Create Prompt");
    assert!(sub.drain().is_empty());
    assert_eq!(r.back(), Some(Route::PromptsList));
  }

  #[test]
  fn unknown_address_navigation_shows_list() {
    let (mut r, _) = router();
    r.navigate(Route::Settings);
    assert_eq!(r.navigate_to_address("/nonsense"), Route::PromptsList);
  }
}
