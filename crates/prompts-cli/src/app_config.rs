//! Runtime configuration: built-in defaults, then the optional TOML file,
//! then `PROMPTS_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.prompts/promptsDB.sqlite3";

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Terminal prompt library")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "prompts.toml")]
  pub config: PathBuf,

  /// SQLite database file.
  #[arg(long, value_name = "PATH")]
  pub store: Option<PathBuf>,

  /// Keep everything in memory; nothing is written to disk.
  #[arg(long)]
  pub in_memory: bool,

  /// Write logs to this file. Without one, nothing is logged.
  #[arg(long, value_name = "PATH")]
  pub log_file: Option<PathBuf>,

  /// Address to open at startup, e.g. `/editor?id=3` or `#settings`.
  #[arg(long, value_name = "ADDRESS")]
  pub open: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
  pub store_path:    PathBuf,
  pub in_memory:     bool,
  pub log_file:      Option<PathBuf>,
  /// `EnvFilter` directives.
  pub log_filter:    String,
  pub start_address: String,
}

impl AppConfig {
  pub fn load(cli: &Cli) -> anyhow::Result<Self> {
    let path_value = |p: &Option<PathBuf>| {
      p.as_deref().map(|p| p.to_string_lossy().into_owned())
    };

    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("in_memory", false)?
      .set_default("log_filter", "info")?
      .set_default("start_address", "/")?
      .add_source(config::File::from(cli.config.as_path()).required(false))
      .add_source(config::Environment::with_prefix("PROMPTS"))
      .set_override_option("store_path", path_value(&cli.store))?
      .set_override_option("log_file", path_value(&cli.log_file))?
      .set_override_option("start_address", cli.open.clone())?
      .set_override_option("in_memory", cli.in_memory.then_some(true))?
      .build()
      .context("failed to read config file")?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.log_file = cfg.log_file.as_deref().map(expand_tilde);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
