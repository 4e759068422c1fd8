//! Prompt editor pane.

use prompts_app::views::{EditorStatus, PromptEditorView};
use prompts_core::store::{PromptStore, SettingsStore};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, EditorField};

pub fn draw<S: PromptStore + SettingsStore>(
  f: &mut Frame,
  area: Rect,
  editor: &PromptEditorView<S>,
  app: &App<S>,
) {
  let status = match editor.status() {
    EditorStatus::Empty => "new",
    EditorStatus::Loading(_) => "loading…",
    EditorStatus::Populated => "",
    EditorStatus::Dirty => "modified",
    EditorStatus::Saving => "saving…",
    EditorStatus::Saved => "saved",
  };
  let outer = Block::default()
    .title(format!(" {} ", app.shell.title()))
    .title_bottom(Line::from(format!(" {status} ")).right_aligned())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = outer.inner(area);
  f.render_widget(outer, area);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(inner);

  let left = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // title
      Constraint::Min(5),    // content
      Constraint::Length(4), // tags
      Constraint::Length(1), // notice
    ])
    .split(cols[0]);

  let right = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // example input
      Constraint::Length(3), // example output
      Constraint::Min(3),    // examples
      Constraint::Length(3), // file path
      Constraint::Min(3),    // files
    ])
    .split(cols[1]);

  let focus = app.focus;
  field(f, left[0], "Title", editor.title(), focus == EditorField::Title);
  field(f, left[1], "Content", editor.content(), focus == EditorField::Content);

  let mut tag_spans: Vec<Span> = editor
    .tags()
    .iter()
    .map(|t| Span::styled(format!("#{t} "), Style::default().fg(Color::Yellow)))
    .collect();
  if tag_spans.is_empty() {
    tag_spans.push(Span::styled("no tags", Style::default().fg(Color::DarkGray)));
  }
  let tags = vec![Line::from(tag_spans), Line::from(format!("+ {}", editor.tag_input()))];
  f.render_widget(
    Paragraph::new(tags).block(field_block("Tags (Enter adds)", focus == EditorField::Tags)),
    left[2],
  );

  if let Some(notice) = editor.notice() {
    f.render_widget(
      Paragraph::new(notice.to_owned()).style(Style::default().fg(Color::Red)),
      left[3],
    );
  }

  field(f, right[0], "Example input", &app.example_input, focus == EditorField::ExampleInput);
  field(f, right[1], "Example output", &app.example_output, focus == EditorField::ExampleOutput);

  let examples: Vec<Line> = editor
    .examples()
    .iter()
    .map(|e| Line::from(format!("{} → {}", e.input, e.output)))
    .chain(editor.new_examples().iter().map(|e| {
      Line::from(Span::styled(
        format!("{} → {} (unsaved)", e.input, e.output),
        Style::default().add_modifier(Modifier::ITALIC),
      ))
    }))
    .collect();
  f.render_widget(
    Paragraph::new(examples).block(field_block("Examples", false)),
    right[2],
  );

  field(f, right[3], "Attach file (path)", &app.file_path, focus == EditorField::FilePath);

  let files: Vec<Line> = editor
    .files()
    .iter()
    .map(|a| Line::from(format!("{} ({}, {} B)", a.name, a.mime_type, a.data.len())))
    .chain(editor.new_files().iter().map(|a| {
      Line::from(Span::styled(
        format!("{} ({}, {} B) (unsaved)", a.name, a.mime_type, a.data.len()),
        Style::default().add_modifier(Modifier::ITALIC),
      ))
    }))
    .collect();
  f.render_widget(Paragraph::new(files).block(field_block("Files", false)), right[4]);

  if let Some(file) = editor.pending_file_removal() {
    super::draw_confirm(f, area, "Remove file", &format!("Remove {}?", file.name));
  }
}

fn field_block(label: &str, focused: bool) -> Block<'static> {
  let style = if focused {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  Block::default()
    .title(format!(" {label} "))
    .borders(Borders::ALL)
    .border_style(style)
}

fn field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
  let text = if focused { format!("{value}_") } else { value.to_owned() };
  f.render_widget(
    Paragraph::new(text)
      .block(field_block(label, focused))
      .wrap(Wrap { trim: false }),
    area,
  );
}
