//! SQL schema for the Counsel SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string; never serialized out
    contact       TEXT NOT NULL DEFAULT '',
    is_admin      INTEGER NOT NULL DEFAULT 0,
    practice_area TEXT NOT NULL DEFAULT 'Others',
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at    TEXT NOT NULL
);

-- Payloads are stored as text-safe base64 alongside the metadata. A
-- document belongs to exactly one user; deleting the user removes their
-- documents in the same statement's transaction.
CREATE TABLE IF NOT EXISTS documents (
    document_id TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    file_name   TEXT NOT NULL,
    media_type  TEXT NOT NULL,
    payload_b64 TEXT NOT NULL,
    uploaded_at TEXT NOT NULL
);

-- Inquiries are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS inquiries (
    inquiry_id   TEXT PRIMARY KEY,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    email        TEXT NOT NULL,
    phone        TEXT NOT NULL,
    matter_type  TEXT NOT NULL,
    message      TEXT NOT NULL,
    submitted_at TEXT NOT NULL    -- server-assigned
);

CREATE INDEX IF NOT EXISTS documents_owner_idx     ON documents(user_id);
CREATE INDEX IF NOT EXISTS inquiries_submitted_idx ON inquiries(submitted_at);

PRAGMA user_version = 1;
";
