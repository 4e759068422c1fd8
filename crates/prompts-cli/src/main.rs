//! `prompts`: terminal UI for a local prompt library.
//!
//! # Usage
//!
//! ```
//! prompts
//! prompts --store ~/work/prompts.sqlite3 --log-file /tmp/prompts.log
//! prompts --in-memory --open '/editor'
//! ```

mod app;
mod app_config;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::App;
use app_config::{AppConfig, Cli};
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
    enable_raw_mode,
  },
};
use prompts_app::Shell;
use prompts_core::{
  memory::MemoryStore,
  store::{PromptStore, SettingsStore},
};
use prompts_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli)?;

  init_tracing(&cfg)?;

  if cfg.in_memory {
    tracing::info!("using in-memory store");
    return run(Arc::new(MemoryStore::new()), &cfg).await;
  }

  if let Some(dir) = cfg.store_path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {}", dir.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  tracing::info!(path = ?cfg.store_path, "opened store");

  run(Arc::new(store), &cfg).await
}

/// Log to the configured file. The terminal belongs to the UI, so without a
/// log file no subscriber is installed.
fn init_tracing(cfg: &AppConfig) -> Result<()> {
  let Some(path) = &cfg.log_file else {
    return Ok(());
  };
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {}", dir.display()))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("failed to open log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(&cfg.log_filter),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Terminal ─────────────────────────────────────────────────────────────────

async fn run<S>(store: Arc<S>, cfg: &AppConfig) -> Result<()>
where
  S: PromptStore + SettingsStore + 'static,
{
  let shell = Shell::new(store, cfg.start_address.clone()).await;
  let mut app = App::new(shell);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop<S: PromptStore + SettingsStore>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  let mut title = String::new();

  loop {
    let document_title = app.shell.document_title();
    if document_title != title {
      execute!(terminal.backend_mut(), SetTitle(&document_title)).ok();
      title = document_title;
    }

    let now = Instant::now();
    terminal.draw(|f| ui::draw(f, app, now)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(100))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key).await? {
          break;
        }
      }
      // Terminal will redraw on next iteration; flashes expire on their own.
      _ => {}
    }
  }

  Ok(())
}
