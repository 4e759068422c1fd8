//! [`SqliteStore`], the SQLite implementation of [`PromptStore`] and
//! [`SettingsStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, warn};

use prompts_core::{
  prompt::{
    Example, FileAttachment, NewExample, NewFile, NewPrompt, Prompt,
    PromptDetail, PromptId, PromptUpdate, touch,
  },
  query::PromptQuery,
  settings::Settings,
  store::{PromptStore, SettingsStore},
};

use crate::{
  Error, Result,
  encode::{
    EXAMPLE_COLUMNS, FILE_COLUMNS, PROMPT_COLUMNS, RawExample, RawFile,
    RawPrompt, decode_dt_column, encode_dt, encode_tags,
  },
  schema::{SCHEMA, SETTINGS_KEY},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A prompt store backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Select every prompt, in id order.
  async fn select_prompts(&self) -> Result<Vec<Prompt>> {
    let raws: Vec<RawPrompt> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PROMPT_COLUMNS} FROM prompts ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawPrompt::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPrompt::into_prompt).collect()
  }
}

/// Returns `true` if a prompt with `id` exists, as seen by `conn`.
fn prompt_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM prompts WHERE id = ?1", [id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

fn insert_file(
  conn: &rusqlite::Connection,
  prompt_id: i64,
  file: NewFile,
  created_at: &str,
) -> rusqlite::Result<RawFile> {
  conn.execute(
    "INSERT INTO files (prompt_id, name, mime_type, data, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![prompt_id, file.name, file.mime_type, file.data, created_at],
  )?;
  Ok(RawFile {
    id: conn.last_insert_rowid(),
    prompt_id,
    name: file.name,
    mime_type: file.mime_type,
    data: file.data,
    created_at: created_at.to_owned(),
  })
}

fn insert_example(
  conn: &rusqlite::Connection,
  prompt_id: i64,
  example: NewExample,
  created_at: &str,
) -> rusqlite::Result<RawExample> {
  conn.execute(
    "INSERT INTO examples (prompt_id, input, output, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![prompt_id, example.input, example.output, created_at],
  )?;
  Ok(RawExample {
    id: conn.last_insert_rowid(),
    prompt_id,
    input: example.input,
    output: example.output,
    created_at: created_at.to_owned(),
  })
}

// ─── PromptStore impl ────────────────────────────────────────────────────────

impl PromptStore for SqliteStore {
  type Error = Error;

  async fn create_prompt(&self, draft: NewPrompt) -> Result<PromptId> {
    let tags_str = encode_tags(&draft.tags)?;
    let now_str  = encode_dt(Utc::now());
    let NewPrompt { title, content, files, examples, .. } = draft;

    // One transaction for the whole aggregate: dropping `tx` on any error
    // rolls back the prompt row together with its dependents.
    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO prompts (title, content, tags, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![title, content, tags_str, now_str],
        )?;
        let id = tx.last_insert_rowid();

        for file in files {
          insert_file(&tx, id, file, &now_str)?;
        }
        for example in examples {
          insert_example(&tx, id, example, &now_str)?;
        }

        tx.commit()?;
        Ok(id)
      })
      .await
      .inspect_err(|e| warn!(error = %e, "create_prompt rolled back"))?;

    debug!(id, "created prompt");
    Ok(PromptId(id))
  }

  async fn get_prompt(&self, id: PromptId) -> Result<PromptDetail> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let prompt = tx
          .query_row(
            &format!("SELECT {PROMPT_COLUMNS} FROM prompts WHERE id = ?1"),
            [id.0],
            RawPrompt::from_row,
          )
          .optional()?;

        let Some(prompt) = prompt else {
          return Ok(None);
        };

        let files = tx
          .prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE prompt_id = ?1 ORDER BY id"
          ))?
          .query_map([id.0], RawFile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let examples = tx
          .prepare(&format!(
            "SELECT {EXAMPLE_COLUMNS} FROM examples WHERE prompt_id = ?1 ORDER BY id"
          ))?
          .query_map([id.0], RawExample::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((prompt, files, examples)))
      })
      .await?;

    let (prompt, files, examples) = raw.ok_or(Error::PromptNotFound(id))?;

    Ok(PromptDetail {
      prompt:   prompt.into_prompt()?,
      files:    files.into_iter().map(RawFile::into_file).collect::<Result<_>>()?,
      examples: examples
        .into_iter()
        .map(RawExample::into_example)
        .collect::<Result<_>>()?,
    })
  }

  async fn update_prompt(&self, id: PromptId, update: PromptUpdate) -> Result<Prompt> {
    let tags_str = update.tags.as_deref().map(encode_tags).transpose()?;
    let PromptUpdate { title, content, .. } = update;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let previous: Option<String> = tx
          .query_row("SELECT updated_at FROM prompts WHERE id = ?1", [id.0], |r| {
            r.get(0)
          })
          .optional()?;

        let Some(previous) = previous else {
          return Ok(None);
        };
        let updated_at = encode_dt(touch(decode_dt_column(0, &previous)?));

        tx.execute(
          "UPDATE prompts SET
             title      = COALESCE(?2, title),
             content    = COALESCE(?3, content),
             tags       = COALESCE(?4, tags),
             updated_at = ?5
           WHERE id = ?1",
          rusqlite::params![id.0, title, content, tags_str, updated_at],
        )?;

        let row = tx.query_row(
          &format!("SELECT {PROMPT_COLUMNS} FROM prompts WHERE id = ?1"),
          [id.0],
          RawPrompt::from_row,
        )?;
        tx.commit()?;
        Ok(Some(row))
      })
      .await?;

    debug!(%id, "updated prompt");
    raw.ok_or(Error::PromptNotFound(id))?.into_prompt()
  }

  async fn delete_prompt(&self, id: PromptId) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM files WHERE prompt_id = ?1", [id.0])?;
        tx.execute("DELETE FROM examples WHERE prompt_id = ?1", [id.0])?;
        let removed = tx.execute("DELETE FROM prompts WHERE id = ?1", [id.0])?;
        tx.commit()?;
        Ok(removed)
      })
      .await
      .inspect_err(|e| warn!(error = %e, %id, "delete_prompt rolled back"))?;

    debug!(%id, removed, "deleted prompt");
    Ok(())
  }

  async fn get_all_prompts(&self) -> Result<Vec<Prompt>> { self.select_prompts().await }

  async fn search_prompts(&self, query: &PromptQuery) -> Result<Vec<Prompt>> {
    // Full scan; tags live in a JSON column, so filtering happens here.
    let mut prompts = self.select_prompts().await?;
    prompts.retain(|p| query.matches(p));
    Ok(prompts)
  }

  async fn attach_file(&self, id: PromptId, file: NewFile) -> Result<FileAttachment> {
    let now_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !prompt_exists(&tx, id.0)? {
          return Ok(None);
        }
        let raw = insert_file(&tx, id.0, file, &now_str)?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.ok_or(Error::PromptNotFound(id))?.into_file()
  }

  async fn add_example(&self, id: PromptId, example: NewExample) -> Result<Example> {
    let now_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !prompt_exists(&tx, id.0)? {
          return Ok(None);
        }
        let raw = insert_example(&tx, id.0, example, &now_str)?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.ok_or(Error::PromptNotFound(id))?.into_example()
  }
}

// ─── SettingsStore impl ──────────────────────────────────────────────────────

impl SettingsStore for SqliteStore {
  type Error = Error;

  async fn load_settings(&self) -> Result<Option<Settings>> {
    let raw: Option<String> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM settings WHERE key = ?1",
              [SETTINGS_KEY],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
  }

  async fn save_settings(&self, settings: Settings) -> Result<()> {
    let value = serde_json::to_string(&settings)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT (key) DO UPDATE SET value = excluded.value",
          rusqlite::params![SETTINGS_KEY, value],
        )?;
        Ok(())
      })
      .await?;

    debug!("saved settings");
    Ok(())
  }
}
