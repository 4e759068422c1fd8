//! The settings panel. Edits a local copy of [`Settings`] and persists it on
//! save.

use std::{sync::Arc, time::Instant};

use prompts_core::{settings::Settings, store::SettingsStore};
use tracing::{info, warn};

use super::{Flash, SAVE_CONFIRMATION_TTL, visible};
use crate::{
  Error, Result,
  events::{AppEvent, EventBus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
  DarkMode,
  Notifications,
  AutoSave,
  FontSize,
}

impl SettingField {
  pub const ALL: [SettingField; 4] = [
    SettingField::DarkMode,
    SettingField::Notifications,
    SettingField::AutoSave,
    SettingField::FontSize,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::DarkMode => "Dark Mode",
      Self::Notifications => "Notifications",
      Self::AutoSave => "Auto Save",
      Self::FontSize => "Font Size",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::DarkMode => "Use dark theme",
      Self::Notifications => "Enable notifications",
      Self::AutoSave => "Automatically save changes",
      Self::FontSize => "Adjust text size",
    }
  }
}

pub struct SettingsPanel<S> {
  store:    Arc<S>,
  bus:      EventBus,
  settings: Settings,
  saved:    Option<Flash>,
  error:    Option<String>,
}

impl<S: SettingsStore> SettingsPanel<S> {
  /// Load the stored settings, or the defaults if none were saved or the
  /// load failed.
  pub async fn mount(store: Arc<S>, bus: EventBus) -> Self {
    let (settings, error) = match store.load_settings().await {
      Ok(stored) => (stored.unwrap_or_default(), None),
      Err(e) => {
        warn!(error = %e, "loading settings failed");
        (Settings::default(), Some("Failed to load settings".to_owned()))
      }
    };
    Self { store, bus, settings, saved: None, error }
  }

  pub fn settings(&self) -> &Settings { &self.settings }

  pub fn error(&self) -> Option<&str> { self.error.as_deref() }

  /// Human-readable value of `field`.
  pub fn value(&self, field: SettingField) -> &'static str {
    let on_off = |on: bool| if on { "On" } else { "Off" };
    match field {
      SettingField::DarkMode => on_off(self.settings.dark_mode),
      SettingField::Notifications => on_off(self.settings.notifications),
      SettingField::AutoSave => on_off(self.settings.auto_save),
      SettingField::FontSize => self.settings.font_size.label(),
    }
  }

  /// Flip a boolean field, or advance the font size.
  pub fn toggle(&mut self, field: SettingField) {
    let s = &mut self.settings;
    match field {
      SettingField::DarkMode => s.dark_mode = !s.dark_mode,
      SettingField::Notifications => s.notifications = !s.notifications,
      SettingField::AutoSave => s.auto_save = !s.auto_save,
      SettingField::FontSize => s.font_size = s.font_size.cycle(),
    }
  }

  /// Restore the defaults in the local copy. Nothing is persisted until
  /// [`save`](Self::save).
  pub fn reset(&mut self) { self.settings = Settings::default(); }

  /// Persist the local copy and show the confirmation.
  pub async fn save(&mut self, now: Instant) -> Result<()> {
    match self.store.save_settings(self.settings).await {
      Ok(()) => {
        info!(settings = ?self.settings, "settings saved");
        self.error = None;
        self.saved = Some(Flash::new("Saved!", SAVE_CONFIRMATION_TTL, now));
        self.bus.publish(AppEvent::SettingsSaved(self.settings));
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "saving settings failed");
        self.error = Some("Failed to save settings".into());
        Err(Error::store(e))
      }
    }
  }

  /// Label of the save button at `now`.
  pub fn button_label(&self, now: Instant) -> &str {
    visible(&self.saved, now).unwrap_or("Save Settings")
  }
}
