//! Prompt aggregate types.
//!
//! A prompt owns its file attachments and examples; together they form the
//! aggregate that is created and deleted as one unit. Dependents are never
//! stored without a parent.

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Store-assigned, auto-incrementing prompt identifier. The first prompt in
/// an empty store is `1`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct PromptId(pub i64);

impl fmt::Display for PromptId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for PromptId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct FileId(pub i64);

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct ExampleId(pub i64);

// ─── Records ─────────────────────────────────────────────────────────────────

/// The primary record. Timestamps are set by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
  pub id:         PromptId,
  pub title:      String,
  pub content:    String,
  /// Ordered; duplicates are allowed.
  pub tags:       Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A binary attachment owned by exactly one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
  pub id:         FileId,
  pub prompt_id:  PromptId,
  pub name:       String,
  pub mime_type:  String,
  pub data:       Vec<u8>,
  pub created_at: DateTime<Utc>,
}

/// An input/output demonstration pair owned by exactly one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
  pub id:         ExampleId,
  pub prompt_id:  PromptId,
  pub input:      String,
  pub output:     String,
  pub created_at: DateTime<Utc>,
}

/// The read model returned by
/// [`PromptStore::get_prompt`](crate::store::PromptStore::get_prompt): the
/// prompt merged with its dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDetail {
  #[serde(flatten)]
  pub prompt:   Prompt,
  pub files:    Vec<FileAttachment>,
  pub examples: Vec<Example>,
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

/// Input to [`PromptStore::create_prompt`](crate::store::PromptStore::create_prompt).
/// Identifiers and timestamps are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPrompt {
  pub title:    String,
  pub content:  String,
  pub tags:     Vec<String>,
  pub files:    Vec<NewFile>,
  pub examples: Vec<NewExample>,
}

impl NewPrompt {
  /// Convenience constructor with no tags and no dependents.
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      content: content.into(),
      ..Self::default()
    }
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
  pub name:      String,
  pub mime_type: String,
  pub data:      Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExample {
  pub input:  String,
  pub output: String,
}

/// Fields to shallow-merge over an existing prompt. `None` leaves the stored
/// value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptUpdate {
  pub title:   Option<String>,
  pub content: Option<String>,
  pub tags:    Option<Vec<String>>,
}

impl PromptUpdate {
  /// Apply this update to `prompt` and refresh `updated_at`.
  pub fn apply(self, prompt: &mut Prompt) {
    if let Some(title) = self.title {
      prompt.title = title;
    }
    if let Some(content) = self.content {
      prompt.content = content;
    }
    if let Some(tags) = self.tags {
      prompt.tags = tags;
    }
    prompt.updated_at = touch(prompt.updated_at);
  }
}

/// The next modification timestamp for a record last modified at
/// `previous`. Always strictly later than `previous`, even when the wall
/// clock has not advanced.
pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
  let now = Utc::now();
  if now > previous {
    now
  } else {
    previous + Duration::microseconds(1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prompt_id_parses_trimmed_digits() {
    assert_eq!(" 42 ".parse::<PromptId>().unwrap(), PromptId(42));
    assert!("abc".parse::<PromptId>().is_err());
  }

  #[test]
  fn touch_is_strictly_monotonic() {
    let future = Utc::now() + Duration::seconds(60);
    assert!(touch(future) > future);
  }

  #[test]
  fn update_only_touches_given_fields() {
    let at = Utc::now();
    let mut prompt = Prompt {
      id:         PromptId(1),
      title:      "Old".into(),
      content:    "Body".into(),
      tags:       vec!["a".into()],
      created_at: at,
      updated_at: at,
    };

    PromptUpdate { title: Some("New".into()), ..Default::default() }
      .apply(&mut prompt);

    assert_eq!(prompt.title, "New");
    assert_eq!(prompt.content, "Body");
    assert_eq!(prompt.tags, ["a"]);
    assert!(prompt.updated_at > prompt.created_at);
  }

  #[test]
  fn detail_serialises_flat() {
    let at = Utc::now();
    let detail = PromptDetail {
      prompt:   Prompt {
        id:         PromptId(7),
        title:      "T".into(),
        content:    "C".into(),
        tags:       vec![],
        created_at: at,
        updated_at: at,
      },
      files:    vec![],
      examples: vec![],
    };
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["id"], 7);
    assert!(json["files"].as_array().unwrap().is_empty());
  }
}
