//! Prompt list pane: a grid of cards.

use prompts_app::views::{ListDisplay, PromptListView};
use prompts_core::{
  prompt::Prompt,
  store::{PromptStore, SettingsStore},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 7;

/// Render the list view into `area`.
pub fn draw<S: PromptStore + SettingsStore>(
  f: &mut Frame,
  area: Rect,
  list: &PromptListView<S>,
  app: &App<S>,
) {
  let title = match &app.filter_input {
    Some(input) => format!(" {} /{input}_ ", app.shell.title()),
    None if !list.filter().is_empty() => {
      format!(" {} ({}) /{} ", app.shell.title(), list.prompts().len(), list.filter())
    }
    None => format!(" {} ({}) ", app.shell.title(), list.prompts().len()),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let hint = |text: &str, color: Color| {
    Paragraph::new(text.to_owned()).style(Style::default().fg(color))
  };

  match list.display() {
    ListDisplay::Loading => f.render_widget(hint("Loading…", Color::DarkGray), inner),
    ListDisplay::Error(msg) => f.render_widget(hint(msg, Color::Red), inner),
    ListDisplay::Empty => f.render_widget(
      hint("No prompts yet. Press n to create one.", Color::DarkGray),
      inner,
    ),
    ListDisplay::Grid(prompts) => draw_grid(f, inner, prompts, list.cursor()),
  }

  if let Some(prompt) = list.pending_delete() {
    super::draw_confirm(
      f,
      area,
      "Delete prompt",
      &format!("Delete \"{}\"? This cannot be undone.", prompt.title),
    );
  }
}

fn draw_grid(f: &mut Frame, area: Rect, prompts: &[Prompt], cursor: usize) {
  let columns = (area.width / CARD_WIDTH).max(1) as usize;
  let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

  // Scroll so the cursor's row stays visible.
  let cursor_row = cursor / columns;
  let first_row = cursor_row.saturating_sub(visible_rows - 1);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
    .split(area);

  for (row_offset, row_area) in rows.iter().enumerate() {
    let cells = Layout::default()
      .direction(Direction::Horizontal)
      .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
      .split(*row_area);

    for (col, cell) in cells.iter().enumerate() {
      let index = (first_row + row_offset) * columns + col;
      if let Some(prompt) = prompts.get(index) {
        draw_card(f, *cell, prompt, index == cursor);
      }
    }
  }
}

fn draw_card(f: &mut Frame, area: Rect, prompt: &Prompt, selected: bool) {
  let border = if selected {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let block = Block::default()
    .title(format!(" {} ", prompt.title))
    .borders(Borders::ALL)
    .border_style(border);

  let tags: Vec<Span> = prompt
    .tags
    .iter()
    .map(|t| Span::styled(format!("#{t} "), Style::default().fg(Color::Yellow)))
    .collect();
  let updated = prompt.updated_at.format("%Y-%m-%d").to_string();

  let mut lines: Vec<Line> = prompt
    .content
    .lines()
    .take(2)
    .map(|l| Line::from(l.to_owned()))
    .collect();
  lines.push(Line::from(tags));
  lines.push(Line::from(Span::styled(updated, Style::default().fg(Color::DarkGray))));

  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
    area,
  );
}
