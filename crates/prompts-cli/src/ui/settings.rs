//! Settings pane.

use std::time::Instant;

use prompts_app::views::{SettingField, SettingsPanel};
use prompts_core::store::{PromptStore, SettingsStore};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw<S: PromptStore + SettingsStore>(
  f: &mut Frame,
  area: Rect,
  panel: &SettingsPanel<S>,
  app: &App<S>,
  now: Instant,
) {
  let block = Block::default()
    .title(format!(" {} ", app.shell.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut lines = Vec::new();
  for (i, field) in SettingField::ALL.iter().enumerate() {
    let selected = i == app.settings_cursor;
    let label_style = if selected {
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
      Style::default().add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![
      Span::styled(if selected { "> " } else { "  " }, label_style),
      Span::styled(format!("{:<16}", field.label()), label_style),
      Span::raw(panel.value(*field)),
    ]));
    lines.push(Line::from(Span::styled(
      format!("    {}", field.description()),
      Style::default().fg(Color::DarkGray),
    )));
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("[ {} ]", panel.button_label(now)),
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
  )));
  if let Some(error) = panel.error() {
    lines.push(Line::from(Span::styled(error.to_owned(), Style::default().fg(Color::Red))));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}
