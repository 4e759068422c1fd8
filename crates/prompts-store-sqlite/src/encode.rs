//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and tags as a compact JSON
//! array. Identifiers are plain SQLite integer row ids.

use chrono::{DateTime, Utc};
use prompts_core::prompt::{
  Example, ExampleId, FileAttachment, FileId, Prompt, PromptId,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// [`decode_dt`] for use inside a connection closure, where only
/// `rusqlite` errors can be returned.
pub fn decode_dt_column(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(e),
      )
    })
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PROMPT_COLUMNS: &str =
  "id, title, content, tags, created_at, updated_at";

/// Raw values read directly from a `prompts` row.
pub struct RawPrompt {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub tags:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawPrompt {
  /// Map a row selected with [`PROMPT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      content:    row.get(2)?,
      tags:       row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_prompt(self) -> Result<Prompt> {
    Ok(Prompt {
      id:         PromptId(self.id),
      title:      self.title,
      content:    self.content,
      tags:       decode_tags(&self.tags)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const FILE_COLUMNS: &str = "id, prompt_id, name, mime_type, data, created_at";

/// Raw values read directly from a `files` row.
pub struct RawFile {
  pub id:         i64,
  pub prompt_id:  i64,
  pub name:       String,
  pub mime_type:  String,
  pub data:       Vec<u8>,
  pub created_at: String,
}

impl RawFile {
  /// Map a row selected with [`FILE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      prompt_id:  row.get(1)?,
      name:       row.get(2)?,
      mime_type:  row.get(3)?,
      data:       row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_file(self) -> Result<FileAttachment> {
    Ok(FileAttachment {
      id:         FileId(self.id),
      prompt_id:  PromptId(self.prompt_id),
      name:       self.name,
      mime_type:  self.mime_type,
      data:       self.data,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const EXAMPLE_COLUMNS: &str = "id, prompt_id, input, output, created_at";

/// Raw values read directly from an `examples` row.
pub struct RawExample {
  pub id:         i64,
  pub prompt_id:  i64,
  pub input:      String,
  pub output:     String,
  pub created_at: String,
}

impl RawExample {
  /// Map a row selected with [`EXAMPLE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      prompt_id:  row.get(1)?,
      input:      row.get(2)?,
      output:     row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_example(self) -> Result<Example> {
    Ok(Example {
      id:         ExampleId(self.id),
      prompt_id:  PromptId(self.prompt_id),
      input:      self.input,
      output:     self.output,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
