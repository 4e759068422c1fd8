//! Prompt search criteria, shared by every backend.

use serde::{Deserialize, Serialize};

use crate::prompt::Prompt;

/// Parameters for [`PromptStore::search_prompts`](crate::store::PromptStore::search_prompts).
///
/// Both filters are optional and combine conjunctively. A default query
/// matches every prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptQuery {
  /// Case-insensitive substring matched against title or content.
  pub query: Option<String>,
  /// Every one of these tags must be present on the prompt.
  pub tags:  Vec<String>,
}

impl PromptQuery {
  pub fn text(query: impl Into<String>) -> Self {
    Self { query: Some(query.into()), tags: Vec::new() }
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }

  /// Parse a free-form filter line. Tokens starting with `#` become tag
  /// filters; the remaining words form the text query.
  pub fn parse(input: &str) -> Self {
    let mut words = Vec::new();
    let mut tags = Vec::new();
    for token in input.split_whitespace() {
      match token.strip_prefix('#') {
        Some(tag) if !tag.is_empty() => tags.push(tag.to_owned()),
        Some(_) => {}
        None => words.push(token),
      }
    }
    let query = (!words.is_empty()).then(|| words.join(" "));
    Self { query, tags }
  }

  pub fn is_empty(&self) -> bool {
    self.query.as_deref().is_none_or(str::is_empty) && self.tags.is_empty()
  }

  pub fn matches(&self, prompt: &Prompt) -> bool {
    let matches_query = match self.query.as_deref() {
      None | Some("") => true,
      Some(q) => {
        let needle = q.to_lowercase();
        prompt.title.to_lowercase().contains(&needle)
          || prompt.content.to_lowercase().contains(&needle)
      }
    };

    let matches_tags = self.tags.iter().all(|tag| prompt.tags.contains(tag));

    matches_query && matches_tags
  }
}
