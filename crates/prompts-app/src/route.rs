//! Routes and the pure address → route parser.
//!
//! The address (path + query, or a `#hash`) is the single source of truth for
//! which section is visible. [`Route::parse`] never fails: anything it does
//! not recognise maps to [`Route::PromptsList`].

use std::fmt;

use prompts_core::prompt::PromptId;
use url::Url;

/// Origin used to resolve relative addresses. Only path, query and fragment
/// of the result are ever inspected.
const ORIGIN: &str = "http://localhost/";

const APP_NAME: &str = "Prompts AI";

// ─── Section ─────────────────────────────────────────────────────────────────

/// A visible region of the application. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
  PromptsList,
  Editor,
  Analytics,
  Testing,
  Settings,
}

impl Section {
  /// Sections reachable from the navigation strip, in display order.
  pub const NAVIGABLE: [Section; 4] = [
    Section::PromptsList,
    Section::Analytics,
    Section::Testing,
    Section::Settings,
  ];

  /// The route a navigation link to this section leads to.
  pub fn route(self) -> Route {
    match self {
      Self::PromptsList => Route::PromptsList,
      Self::Editor => Route::Editor(None),
      Self::Analytics => Route::Analytics,
      Self::Testing => Route::Testing,
      Self::Settings => Route::Settings,
    }
  }

  /// Label used by the navigation strip.
  pub fn label(self) -> &'static str {
    match self {
      Self::PromptsList => "Prompts",
      Self::Editor => "Editor",
      Self::Analytics => "Analytics",
      Self::Testing => "Testing",
      Self::Settings => "Settings",
    }
  }
}

// ─── Route ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
  #[default]
  PromptsList,
  /// `None` creates a new prompt; `Some(id)` edits an existing one.
  Editor(Option<PromptId>),
  Analytics,
  Testing,
  Settings,
}

impl Route {
  /// Derive the route from an address.
  ///
  /// Accepts a path with optional query (`/editor?id=3`), a bare hash
  /// (`#settings`, `#/editor?id=3`), or a full URL. The hash is consulted
  /// only when the path is empty or `/`.
  pub fn parse(address: &str) -> Route {
    let Ok(origin) = Url::parse(ORIGIN) else {
      return Route::PromptsList;
    };
    let Ok(url) = origin.join(address.trim()) else {
      return Route::PromptsList;
    };

    if url.path() == "/"
      && let Some(fragment) = url.fragment().filter(|f| !f.is_empty())
    {
      let inner = format!("/{}", fragment.trim_start_matches('/'));
      return match origin.join(&inner) {
        Ok(hash_url) => Self::from_url(&hash_url),
        Err(_) => Route::PromptsList,
      };
    }

    Self::from_url(&url)
  }

  fn from_url(url: &Url) -> Route {
    let first = url
      .path_segments()
      .and_then(|mut segments| segments.next())
      .unwrap_or_default();

    match first {
      "editor" => {
        // A missing or non-numeric id opens a blank editor.
        let id = url
          .query_pairs()
          .find(|(key, _)| key == "id")
          .and_then(|(_, value)| value.parse::<PromptId>().ok());
        Route::Editor(id)
      }
      "analytics" => Route::Analytics,
      "testing" => Route::Testing,
      "settings" => Route::Settings,
      _ => Route::PromptsList,
    }
  }

  /// Canonical address for this route.
  pub fn path(&self) -> String {
    match self {
      Self::PromptsList => "/prompts".into(),
      Self::Editor(None) => "/editor".into(),
      Self::Editor(Some(id)) => format!("/editor?id={id}"),
      Self::Analytics => "/analytics".into(),
      Self::Testing => "/testing".into(),
      Self::Settings => "/settings".into(),
    }
  }

  pub fn section(&self) -> Section {
    match self {
      Self::PromptsList => Section::PromptsList,
      Self::Editor(_) => Section::Editor,
      Self::Analytics => Section::Analytics,
      Self::Testing => Section::Testing,
      Self::Settings => Section::Settings,
    }
  }

  /// Heading shown above the section.
  pub fn title(&self) -> &'static str {
    match self {
      Self::PromptsList => "Prompt Management",
      Self::Editor(None) => "Create Prompt",
      Self::Editor(Some(_)) => "Edit Prompt",
      Self::Analytics => "Analytics Dashboard",
      Self::Testing => "Prompt Testing",
      Self::Settings => "Settings",
    }
  }

  /// Window/document title, e.g. `Prompts AI - Edit Prompt`.
  pub fn document_title(&self) -> String { format!("{APP_NAME} - {}", self.title()) }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.path()) }
}
