//! User preferences: a singleton record stored outside the prompt aggregate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
  Small,
  #[default]
  Medium,
  Large,
}

impl FontSize {
  /// The next size in `small → medium → large → small` order.
  pub fn cycle(self) -> Self {
    match self {
      Self::Small => Self::Medium,
      Self::Medium => Self::Large,
      Self::Large => Self::Small,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Small => "Small",
      Self::Medium => "Medium",
      Self::Large => "Large",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
  pub dark_mode:     bool,
  pub notifications: bool,
  pub auto_save:     bool,
  pub font_size:     FontSize,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      dark_mode:     true,
      notifications: true,
      auto_save:     true,
      font_size:     FontSize::Medium,
    }
  }
}
