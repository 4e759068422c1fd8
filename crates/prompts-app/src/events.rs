//! Typed publish/subscribe between sibling views, the router and the shell.
//!
//! Each [`Subscription`] owns an unbounded channel. Publishing fans the event
//! out to every subscriber whose topic filter matches; delivery is FIFO per
//! subscriber. A subscription ends with [`EventBus::unsubscribe`] or when it is
//! dropped (the closed sender is pruned on the next publish).

use std::sync::{Arc, Mutex, PoisonError};

use prompts_core::{prompt::PromptId, settings::Settings};
use tokio::sync::mpsc;
use tracing::trace;

use crate::route::{Route, Section};

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
  /// A navigation link was activated.
  Navigate(Section),
  /// "Create new prompt" was requested from the list.
  CreatePrompt,
  /// A prompt card was opened for editing.
  EditPrompt(PromptId),
  /// The editor committed a prompt to the store.
  PromptSaved(PromptId),
  /// The list deleted a prompt from the store.
  PromptDeleted(PromptId),
  /// The editor was dismissed without saving.
  CancelEdit,
  /// The router's current route changed.
  RouteChanged(Route),
  SettingsSaved(Settings),
}

/// Named channel an event is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
  Navigate,
  CreatePrompt,
  EditPrompt,
  PromptSaved,
  PromptDeleted,
  CancelEdit,
  RouteChanged,
  SettingsSaved,
}

impl AppEvent {
  pub fn topic(&self) -> Topic {
    match self {
      Self::Navigate(_) => Topic::Navigate,
      Self::CreatePrompt => Topic::CreatePrompt,
      Self::EditPrompt(_) => Topic::EditPrompt,
      Self::PromptSaved(_) => Topic::PromptSaved,
      Self::PromptDeleted(_) => Topic::PromptDeleted,
      Self::CancelEdit => Topic::CancelEdit,
      Self::RouteChanged(_) => Topic::RouteChanged,
      Self::SettingsSaved(_) => Topic::SettingsSaved,
    }
  }
}

// ─── Bus ─────────────────────────────────────────────────────────────────────

type SubscriberId = u64;

struct Subscriber {
  id:     SubscriberId,
  /// Empty means every topic.
  topics: Vec<Topic>,
  tx:     mpsc::UnboundedSender<AppEvent>,
}

impl Subscriber {
  fn wants(&self, topic: Topic) -> bool {
    self.topics.is_empty() || self.topics.contains(&topic)
  }
}

#[derive(Default)]
struct Registry {
  last_id:     SubscriberId,
  subscribers: Vec<Subscriber>,
}

/// Shared handle to the application's event bus.
///
/// Clones publish to the same subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
  registry: Arc<Mutex<Registry>>,
}

impl EventBus {
  pub fn new() -> Self { Self::default() }

  /// Start receiving events on `topics`. An empty slice subscribes to all
  /// topics.
  pub fn subscribe(&self, topics: &[Topic]) -> Subscription {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.last_id += 1;
    let id = registry.last_id;
    registry.subscribers.push(Subscriber { id, topics: topics.to_vec(), tx });
    trace!(id, ?topics, "subscribed");
    Subscription { id, rx }
  }

  /// End a subscription. Events already queued on it are discarded.
  pub fn unsubscribe(&self, subscription: Subscription) {
    let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.subscribers.retain(|s| s.id != subscription.id);
    trace!(id = subscription.id, "unsubscribed");
  }

  /// Deliver `event` to every matching subscriber and return how many
  /// received it.
  pub fn publish(&self, event: AppEvent) -> usize {
    let topic = event.topic();
    let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.subscribers.retain(|s| !s.tx.is_closed());

    let delivered = registry
      .subscribers
      .iter()
      .filter(|s| s.wants(topic))
      .filter(|s| s.tx.send(event.clone()).is_ok())
      .count();
    trace!(?event, delivered, "published");
    delivered
  }

  /// Number of live subscriptions.
  pub fn subscriber_count(&self) -> usize {
    let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.subscribers.retain(|s| !s.tx.is_closed());
    registry.subscribers.len()
  }
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// The receiving end of one subscriber.
pub struct Subscription {
  id: SubscriberId,
  rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl Subscription {
  /// The next queued event, without waiting.
  pub fn try_next(&mut self) -> Option<AppEvent> { self.rx.try_recv().ok() }

  /// Every queued event, oldest first.
  pub fn drain(&mut self) -> Vec<AppEvent> {
    std::iter::from_fn(|| self.try_next()).collect()
  }

  /// Wait for the next event. Returns `None` once unsubscribed.
  pub async fn next(&mut self) -> Option<AppEvent> { self.rx.recv().await }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn delivers_only_matching_topics() {
    let bus = EventBus::new();
    let mut saved = bus.subscribe(&[Topic::PromptSaved]);
    let mut all = bus.subscribe(&[]);

    assert_eq!(bus.publish(AppEvent::CreatePrompt), 1);
    assert_eq!(bus.publish(AppEvent::PromptSaved(PromptId(3))), 2);

    assert_eq!(saved.drain(), [AppEvent::PromptSaved(PromptId(3))]);
    assert_eq!(all.drain(), [
      AppEvent::CreatePrompt,
      AppEvent::PromptSaved(PromptId(3))
    ]);
    assert!(all.try_next().is_none());
  }

  #[test]
  fn unsubscribe_and_drop_stop_delivery() {
    let bus = EventBus::new();
    let a = bus.subscribe(&[]);
    let b = bus.subscribe(&[]);
    assert_eq!(bus.subscriber_count(), 2);

    bus.unsubscribe(a);
    drop(b);

    assert_eq!(bus.publish(AppEvent::CancelEdit), 0);
    assert_eq!(bus.subscriber_count(), 0);
  }

  #[tokio::test]
  async fn next_waits_for_publish() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe(&[Topic::CancelEdit]);
    let publisher = bus.clone();
    tokio::spawn(async move {
      publisher.publish(AppEvent::CancelEdit);
    });
    assert_eq!(sub.next().await, Some(AppEvent::CancelEdit));
  }
}
