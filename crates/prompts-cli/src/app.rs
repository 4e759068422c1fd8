//! Key handling on top of the [`Shell`].
//!
//! The shell owns all application state; this layer only keeps what the
//! terminal needs on top of it (field focus, half-typed inputs) and turns key
//! presses into view calls.

use std::{path::Path, time::Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prompts_app::{
  Shell,
  events::AppEvent,
  route::{Route, Section},
  shell::View,
  views::{PromptEditorView, SettingField},
};
use prompts_core::{
  prompt::NewFile,
  store::{PromptStore, SettingsStore},
};
use tracing::debug;

// ─── Editor focus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorField {
  #[default]
  Title,
  Content,
  Tags,
  ExampleInput,
  ExampleOutput,
  FilePath,
}

impl EditorField {
  const ORDER: [EditorField; 6] = [
    EditorField::Title,
    EditorField::Content,
    EditorField::Tags,
    EditorField::ExampleInput,
    EditorField::ExampleOutput,
    EditorField::FilePath,
  ];

  fn position(self) -> usize {
    Self::ORDER.iter().position(|f| *f == self).unwrap_or_default()
  }

  pub fn next(self) -> Self { Self::ORDER[(self.position() + 1) % Self::ORDER.len()] }

  pub fn prev(self) -> Self {
    Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App<S> {
  pub shell: Shell<S>,

  /// Focused editor field.
  pub focus: EditorField,

  // Editor inputs that only become store data on Enter.
  pub example_input:  String,
  pub example_output: String,
  pub file_path:      String,

  /// The list filter being typed, while filter mode is active.
  pub filter_input: Option<String>,

  pub settings_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  route: Route,
}

impl<S: PromptStore + SettingsStore> App<S> {
  pub fn new(shell: Shell<S>) -> Self {
    let route = shell.route();
    Self {
      shell,
      focus: EditorField::default(),
      example_input: String::new(),
      example_output: String::new(),
      file_path: String::new(),
      filter_input: None,
      settings_cursor: 0,
      status_msg: String::new(),
      route,
    }
  }

  /// Whether keys currently go into a text field.
  pub fn is_typing(&self) -> bool {
    self.filter_input.is_some() || matches!(self.shell.view(), View::Editor(_))
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // History traversal works everywhere.
    match key.code {
      KeyCode::Left if alt => {
        self.shell.back().await;
        return Ok(self.after_key());
      }
      KeyCode::Right if alt => {
        self.shell.forward().await;
        return Ok(self.after_key());
      }
      _ => {}
    }

    if !self.is_typing() && !self.is_confirming() {
      match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Char('[') => {
          self.shell.back().await;
          return Ok(self.after_key());
        }
        KeyCode::Char(']') => {
          self.shell.forward().await;
          return Ok(self.after_key());
        }
        KeyCode::Char(c @ '1'..='4') => {
          let index = c as usize - '1' as usize;
          self.shell.bus().publish(AppEvent::Navigate(Section::NAVIGABLE[index]));
          self.shell.pump().await;
          return Ok(self.after_key());
        }
        _ => {}
      }
    }

    let now = Instant::now();
    match self.shell.section() {
      Section::PromptsList => self.handle_list_key(key, now).await,
      Section::Editor => self.handle_editor_key(key, ctrl).await,
      Section::Settings => self.handle_settings_key(key, now).await,
      Section::Analytics | Section::Testing => {}
    }

    self.shell.pump().await;
    Ok(self.after_key())
  }

  fn is_confirming(&self) -> bool {
    match self.shell.view() {
      View::PromptList(list) => list.is_confirming(),
      View::Editor(editor) => editor.pending_file_removal().is_some(),
      _ => false,
    }
  }

  /// Reset terminal-side state when the route changed under us.
  fn after_key(&mut self) -> bool {
    let route = self.shell.route();
    if route != self.route {
      debug!(from = %self.route, to = %route, "view changed");
      self.route = route;
      self.focus = EditorField::default();
      self.example_input.clear();
      self.example_output.clear();
      self.file_path.clear();
      self.filter_input = None;
      self.settings_cursor = 0;
    }
    true
  }

  // ── List ──────────────────────────────────────────────────────────────────

  async fn handle_list_key(&mut self, key: KeyEvent, now: Instant) {
    let View::PromptList(list) = self.shell.view_mut() else {
      return;
    };

    if list.is_confirming() {
      match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
          list.confirm_delete(now).await;
        }
        KeyCode::Char('n') | KeyCode::Esc => list.cancel_delete(),
        _ => {}
      }
      return;
    }

    if let Some(input) = &mut self.filter_input {
      match key.code {
        KeyCode::Esc => {
          self.filter_input = None;
          list.set_filter("").await;
        }
        KeyCode::Enter => {
          let filter = std::mem::take(input);
          self.filter_input = None;
          list.set_filter(filter).await;
        }
        KeyCode::Backspace => {
          input.pop();
        }
        KeyCode::Char(c) => input.push(c),
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
        list.select_next()
      }
      KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
        list.select_prev()
      }
      KeyCode::Char('n') => list.create(),
      KeyCode::Enter | KeyCode::Char('e') => {
        list.open_selected();
      }
      KeyCode::Char('d') | KeyCode::Delete => list.request_delete_selected(),
      KeyCode::Char('r') => list.reload().await,
      KeyCode::Char('/') => self.filter_input = Some(list.filter().to_owned()),
      _ => {}
    }
  }

  // ── Editor ────────────────────────────────────────────────────────────────

  async fn handle_editor_key(&mut self, key: KeyEvent, ctrl: bool) {
    let View::Editor(editor) = self.shell.view_mut() else {
      return;
    };

    if editor.pending_file_removal().is_some() {
      match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
          editor.confirm_file_removal();
        }
        KeyCode::Char('n') | KeyCode::Esc => editor.cancel_file_removal(),
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Char('s') if ctrl => {
        self.status_msg = match editor.save().await {
          Ok(id) => format!("Saved prompt {id}"),
          Err(e) => format!("Error: {e}"),
        };
      }
      KeyCode::Esc if editor.notice().is_some() => editor.dismiss_notice(),
      KeyCode::Esc => editor.cancel(),
      KeyCode::Tab => self.focus = self.focus.next(),
      KeyCode::BackTab => self.focus = self.focus.prev(),
      KeyCode::Enter => match self.focus {
        EditorField::Title => self.focus = EditorField::Content,
        EditorField::Content => push_char(editor, self.focus, '\n'),
        EditorField::Tags => {
          editor.commit_tag();
        }
        EditorField::ExampleInput => self.focus = EditorField::ExampleOutput,
        EditorField::ExampleOutput => {
          let input = std::mem::take(&mut self.example_input);
          let output = std::mem::take(&mut self.example_output);
          editor.add_example(input, output);
          self.focus = EditorField::ExampleInput;
        }
        EditorField::FilePath => {
          let path = std::mem::take(&mut self.file_path);
          match read_attachment(Path::new(path.trim())).await {
            Ok(file) => {
              self.status_msg = format!("Attached {}", file.name);
              editor.attach_file(file);
            }
            Err(e) => self.status_msg = format!("Error: {e}"),
          }
        }
      },
      KeyCode::Backspace => match self.focus {
        EditorField::ExampleInput => {
          self.example_input.pop();
        }
        EditorField::ExampleOutput => {
          self.example_output.pop();
        }
        EditorField::FilePath if self.file_path.is_empty() => {
          if let Some(last) = editor.new_files().len().checked_sub(1) {
            editor.request_file_removal(last);
          }
        }
        EditorField::FilePath => {
          self.file_path.pop();
        }
        EditorField::Tags if editor.tag_input().is_empty() => {
          if let Some(last) = editor.tags().last().cloned() {
            editor.remove_tag(&last);
          }
        }
        field => pop_char(editor, field),
      },
      KeyCode::Char(c) if !ctrl => match self.focus {
        EditorField::ExampleInput => self.example_input.push(c),
        EditorField::ExampleOutput => self.example_output.push(c),
        EditorField::FilePath => self.file_path.push(c),
        field => push_char(editor, field, c),
      },
      _ => {}
    }
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn handle_settings_key(&mut self, key: KeyEvent, now: Instant) {
    let View::Settings(panel) = self.shell.view_mut() else {
      return;
    };
    let field = SettingField::ALL[self.settings_cursor];

    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        self.settings_cursor = (self.settings_cursor + 1).min(SettingField::ALL.len() - 1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.settings_cursor = self.settings_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Char(' ') => panel.toggle(field),
      KeyCode::Char('s') => {
        if let Err(e) = panel.save(now).await {
          self.status_msg = format!("Error: {e}");
        }
      }
      KeyCode::Char('r') => panel.reset(),
      _ => {}
    }
  }
}

fn push_char<S: PromptStore>(editor: &mut PromptEditorView<S>, field: EditorField, c: char) {
  match field {
    EditorField::Title => {
      let mut title = editor.title().to_owned();
      title.push(c);
      editor.set_title(title);
    }
    EditorField::Content => {
      let mut content = editor.content().to_owned();
      content.push(c);
      editor.set_content(content);
    }
    EditorField::Tags => {
      let mut input = editor.tag_input().to_owned();
      input.push(c);
      editor.set_tag_input(input);
    }
    EditorField::ExampleInput | EditorField::ExampleOutput | EditorField::FilePath => {}
  }
}

fn pop_char<S: PromptStore>(editor: &mut PromptEditorView<S>, field: EditorField) {
  match field {
    EditorField::Title => {
      let mut title = editor.title().to_owned();
      title.pop();
      editor.set_title(title);
    }
    EditorField::Content => {
      let mut content = editor.content().to_owned();
      content.pop();
      editor.set_content(content);
    }
    EditorField::Tags => {
      let mut input = editor.tag_input().to_owned();
      input.pop();
      editor.set_tag_input(input);
    }
    EditorField::ExampleInput | EditorField::ExampleOutput | EditorField::FilePath => {}
  }
}

/// Read `path` into an attachment, guessing the MIME type from the extension.
async fn read_attachment(path: &Path) -> anyhow::Result<NewFile> {
  use anyhow::Context as _;

  let data = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string());
  Ok(NewFile { mime_type: mime_type(path).to_owned(), name, data })
}

fn mime_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .map(|e| e.to_string_lossy().to_ascii_lowercase())
    .unwrap_or_default();
  match ext.as_str() {
    "txt" | "md" => "text/plain",
    "json" => "application/json",
    "csv" => "text/csv",
    "pdf" => "application/pdf",
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    _ => "application/octet-stream",
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use prompts_core::memory::MemoryStore;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn type_str(app: &mut App<MemoryStore>, s: &str) {
    for c in s.chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  async fn app() -> (App<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let shell = Shell::new(store.clone(), "/").await;
    (App::new(shell), store)
  }

  #[test]
  fn focus_cycles_both_ways() {
    assert_eq!(EditorField::FilePath.next(), EditorField::Title);
    assert_eq!(EditorField::Title.prev(), EditorField::FilePath);
  }

  #[test]
  fn mime_types_by_extension() {
    assert_eq!(mime_type(Path::new("notes.MD")), "text/plain");
    assert_eq!(mime_type(Path::new("blob")), "application/octet-stream");
  }

  #[tokio::test]
  async fn create_prompt_from_keyboard() {
    let (mut app, store) = app().await;

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert_eq!(app.shell.section(), Section::Editor);

    type_str(&mut app, "Hello").await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_str(&mut app, "World").await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_str(&mut app, "greeting").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    app.handle_key(save).await.unwrap();

    assert_eq!(app.shell.section(), Section::PromptsList);
    let all = store.get_all_prompts().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Hello");
    assert_eq!(all[0].content, "World");
    assert_eq!(all[0].tags, ["greeting"]);
  }

  #[tokio::test]
  async fn escape_dismisses_notice_before_leaving_editor() {
    let shell = Shell::new(Arc::new(MemoryStore::new()), "/editor?id=5").await;
    let mut app = App::new(shell);
    let View::Editor(editor) = app.shell.view() else { panic!("expected editor") };
    assert!(editor.notice().is_some());

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    let View::Editor(editor) = app.shell.view() else { panic!("expected editor") };
    assert!(editor.notice().is_none());

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.shell.section(), Section::PromptsList);
  }

  #[tokio::test]
  async fn digits_navigate_and_q_quits() {
    let (mut app, _) = app().await;
    app.handle_key(key(KeyCode::Char('4'))).await.unwrap();
    assert_eq!(app.shell.section(), Section::Settings);
    app.handle_key(key(KeyCode::Char('2'))).await.unwrap();
    assert_eq!(app.shell.section(), Section::Analytics);
    app.handle_key(key(KeyCode::Char('['))).await.unwrap();
    assert_eq!(app.shell.section(), Section::Settings);
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  }

  #[tokio::test]
  async fn delete_asks_first() {
    let (mut app, store) = app().await;
    store
      .create_prompt(prompts_core::prompt::NewPrompt::new("A", "a"))
      .await
      .unwrap();
    if let View::PromptList(list) = app.shell.view_mut() {
      list.reload().await;
    }

    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert_eq!(store.get_all_prompts().await.unwrap().len(), 1);

    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('y'))).await.unwrap();
    assert!(store.get_all_prompts().await.unwrap().is_empty());
  }
}
