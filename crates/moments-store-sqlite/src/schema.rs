//! SQL schema for the Moments SQLite store.
//!
//! Executed on every `initialize()`. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Column names are camelCase to stay compatible with databases written by
/// the mobile app.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS moments (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    title          TEXT NOT NULL,
    location       TEXT NOT NULL,
    context        TEXT NOT NULL,
    date           TEXT NOT NULL,   -- ISO 8601 UTC, user-chosen
    companion      TEXT NOT NULL,
    pleasureRating INTEGER NOT NULL CHECK(pleasureRating BETWEEN 1 AND 10),
    comfortRating  INTEGER NOT NULL CHECK(comfortRating BETWEEN 1 AND 10),
    audacityRating INTEGER NOT NULL CHECK(audacityRating BETWEEN 1 AND 10),
    topTags        TEXT NOT NULL DEFAULT '[]',   -- JSON array, opaque here
    flopTags       TEXT NOT NULL DEFAULT '[]',
    personalNotes  TEXT,
    toRenew        TEXT CHECK(toRenew IN ('yes', 'no')),
    createdAt      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS moments_date_idx ON moments(date, createdAt);

PRAGMA user_version = 1;
";

/// Key-value table backing [`SqlitePreferences`](crate::SqlitePreferences).
pub const PREFERENCES_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS preferences (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";
