//! TUI rendering. Orchestrates all panes.

pub mod prompt_editor;
pub mod prompt_list;
pub mod settings;

use std::time::Instant;

use chrono::Local;
use prompts_app::{route::Section, shell::View};
use prompts_core::store::{PromptStore, SettingsStore};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::app::App;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: PromptStore + SettingsStore>(f: &mut Frame, app: &App<S>, now: Instant) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // navigation
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_nav(f, rows[1], app);

  match app.shell.view() {
    View::PromptList(list) => prompt_list::draw(f, rows[2], list, app),
    View::Editor(editor) => prompt_editor::draw(f, rows[2], editor, app),
    View::Settings(panel) => settings::draw(f, rows[2], panel, app, now),
    View::Analytics | View::Testing => draw_placeholder(f, rows[2], app.shell.title()),
  }

  draw_status(f, rows[3], app, now);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: PromptStore + SettingsStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    format!(" Prompts AI  {}", app.shell.title()),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Navigation strip ─────────────────────────────────────────────────────────

fn draw_nav<S: PromptStore + SettingsStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let titles = Section::NAVIGABLE
    .iter()
    .enumerate()
    .map(|(i, s)| format!("{} {}", i + 1, s.label()));

  // The editor is not on the strip; it is reached from the list.
  let selected = Section::NAVIGABLE
    .iter()
    .position(|s| *s == app.shell.section())
    .unwrap_or(0);

  let tabs = Tabs::new(titles)
    .select(selected)
    .style(Style::default().fg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, area);
}

// ─── Placeholder ──────────────────────────────────────────────────────────────

fn draw_placeholder(f: &mut Frame, area: Rect, title: &str) {
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Coming soon.").style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Modal ────────────────────────────────────────────────────────────────────

/// Render a centred yes/no dialog over `area`.
pub(crate) fn draw_confirm(f: &mut Frame, area: Rect, title: &str, message: &str) {
  let width = area.width.clamp(20, 50);
  let height = 5.min(area.height);
  let modal = Rect {
    x: area.x + area.width.saturating_sub(width) / 2,
    y: area.y + area.height.saturating_sub(height) / 2,
    width,
    height,
  };

  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let text = vec![
    Line::from(message.to_owned()),
    Line::from(Span::styled("[y] confirm  [n] cancel", Style::default().fg(Color::DarkGray))),
  ];

  f.render_widget(Clear, modal);
  f.render_widget(
    Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
    modal,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: PromptStore + SettingsStore>(
  f: &mut Frame,
  area: Rect,
  app: &App<S>,
  now: Instant,
) {
  let (mode_label, hints) = match app.shell.view() {
    View::PromptList(list) if list.is_confirming() => ("CONFIRM", "y delete  n cancel"),
    View::PromptList(_) if app.filter_input.is_some() => {
      ("FILTER", "words and #tags  Enter apply  Esc clear")
    }
    View::PromptList(_) => (
      "LIST",
      "←→ select  n new  Enter edit  d delete  / filter  1-4 sections  q quit",
    ),
    View::Editor(_) => (
      "EDIT",
      "Tab next field  Enter add  Ctrl-S save  Esc cancel  Alt-← back",
    ),
    View::Settings(_) => (
      "SETTINGS",
      "↑↓ select  Space toggle  s save  r reset  1-4 sections  q quit",
    ),
    View::Analytics | View::Testing => ("VIEW", "1-4 sections  [ back  ] forward  q quit"),
  };

  let flash = match app.shell.view() {
    View::PromptList(list) => list.flash(now),
    _ => None,
  };
  let status = flash
    .or((!app.status_msg.is_empty()).then_some(app.status_msg.as_str()))
    .unwrap_or(hints);

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_style = match flash {
    Some(_) => Style::default().fg(Color::Red),
    None => Style::default().fg(Color::DarkGray),
  };
  let hint_span = Span::styled(format!("  {status}"), hint_style);

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}
