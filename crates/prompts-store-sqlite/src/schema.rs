//! SQL schema for the prompt store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS prompts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    tags        TEXT NOT NULL DEFAULT '[]',   -- JSON array, order preserved
    created_at  TEXT NOT NULL,                -- RFC 3339 UTC; store-assigned
    updated_at  TEXT NOT NULL
);

-- Dependents are removed explicitly by delete_prompt; the cascade is a
-- second line for any statement that bypasses it.
CREATE TABLE IF NOT EXISTS files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt_id   INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    mime_type   TEXT NOT NULL,
    data        BLOB NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS examples (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt_id   INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
    input       TEXT NOT NULL,
    output      TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Singleton preferences, stored outside the prompt aggregate.
CREATE TABLE IF NOT EXISTS settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL                 -- JSON
);

CREATE INDEX IF NOT EXISTS prompts_created_idx   ON prompts(created_at);
CREATE INDEX IF NOT EXISTS files_prompt_idx      ON files(prompt_id);
CREATE INDEX IF NOT EXISTS files_type_idx        ON files(mime_type);
CREATE INDEX IF NOT EXISTS examples_prompt_idx   ON examples(prompt_id);

PRAGMA user_version = 1;
";

/// Key of the settings row in the `settings` table.
pub const SETTINGS_KEY: &str = "app";
