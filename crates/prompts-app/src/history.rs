//! A session history of addresses with back/forward traversal.
//!
//! Mirrors the semantics of a browser's history stack: pushing truncates any
//! forward entries, and traversal only moves the cursor. It stores addresses,
//! never routes; the route is always re-derived from [`History::location`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
  entries: Vec<String>,
  index:   usize,
}

impl History {
  pub fn new(initial: impl Into<String>) -> Self {
    Self { entries: vec![initial.into()], index: 0 }
  }

  /// The current address.
  pub fn location(&self) -> &str { &self.entries[self.index] }

  /// Append `address` after the current entry, discarding forward entries.
  pub fn push(&mut self, address: impl Into<String>) {
    self.entries.truncate(self.index + 1);
    self.entries.push(address.into());
    self.index = self.entries.len() - 1;
  }

  /// Overwrite the current entry.
  pub fn replace(&mut self, address: impl Into<String>) {
    self.entries[self.index] = address.into();
  }

  /// Step back one entry. Returns `false` at the start of the history.
  pub fn back(&mut self) -> bool {
    if self.index == 0 {
      return false;
    }
    self.index -= 1;
    true
  }

  /// Step forward one entry. Returns `false` at the end of the history.
  pub fn forward(&mut self) -> bool {
    if self.index + 1 >= self.entries.len() {
      return false;
    }
    self.index += 1;
    true
  }
}

impl Default for History {
  fn default() -> Self { Self::new("/") }
}
