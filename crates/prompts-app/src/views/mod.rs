//! View components. Each one owns its local form state, talks to the store,
//! and reports outcomes on the [`EventBus`](crate::events::EventBus).
//!
//! Time-dependent affordances take `now` explicitly so rendering stays a pure
//! function of state.

pub mod prompt_editor;
pub mod prompt_list;
pub mod settings;

use std::time::{Duration, Instant};

pub use prompt_editor::{EditorStatus, PromptEditorView};
pub use prompt_list::{ListDisplay, PromptListView};
pub use settings::{SettingField, SettingsPanel};

/// How long a failed-delete message stays visible in the list.
pub const DELETE_ERROR_TTL: Duration = Duration::from_secs(3);

/// How long the "Saved!" confirmation replaces the settings save label.
pub const SAVE_CONFIRMATION_TTL: Duration = Duration::from_secs(2);

/// A transient message that expires on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
  message:    String,
  expires_at: Instant,
}

impl Flash {
  pub fn new(message: impl Into<String>, ttl: Duration, now: Instant) -> Self {
    Self { message: message.into(), expires_at: now + ttl }
  }

  pub fn message(&self) -> &str { &self.message }

  pub fn is_visible(&self, now: Instant) -> bool { now < self.expires_at }
}

/// The message of `flash` if it has not yet expired.
pub(crate) fn visible(flash: &Option<Flash>, now: Instant) -> Option<&str> {
  flash
    .as_ref()
    .filter(|f| f.is_visible(now))
    .map(Flash::message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flash_expires_after_ttl() {
    let now = Instant::now();
    let flash = Some(Flash::new("Failed to delete prompt", DELETE_ERROR_TTL, now));

    assert_eq!(visible(&flash, now), Some("Failed to delete prompt"));
    assert_eq!(visible(&flash, now + Duration::from_millis(2999)), Some("Failed to delete prompt"));
    assert_eq!(visible(&flash, now + DELETE_ERROR_TTL), None);
  }
}
