//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: topics, skills, entries, entry_skills, connections, blindspots",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Indexes for discovery and aggregation queries",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
///
/// The *_norm columns hold trim + casefold forms and carry the uniqueness
/// constraints, so concurrent resolution of case/whitespace variants of the
/// same name can never produce two rows.
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS topics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    title_norm  TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS skills (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    name_norm   TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id        INTEGER NOT NULL REFERENCES topics(id),
    summary         TEXT NOT NULL,
    -- Serialized Classification JSON; NULL until classification succeeds,
    -- written at most once, never overwritten
    classification  TEXT,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS entry_skills (
    entry_id    INTEGER NOT NULL REFERENCES entries(id),
    skill_id    INTEGER NOT NULL REFERENCES skills(id),
    PRIMARY KEY (entry_id, skill_id)
);

CREATE TABLE IF NOT EXISTS connections (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    source_entry_id  INTEGER NOT NULL REFERENCES entries(id),
    target_entry_id  INTEGER NOT NULL REFERENCES entries(id),
    relationship     TEXT NOT NULL,
    strength         REAL NOT NULL DEFAULT 0.5
        CHECK (strength >= 0.0 AND strength <= 1.0),
    created_at       TEXT NOT NULL,
    CHECK (source_entry_id <> target_entry_id),
    UNIQUE (source_entry_id, target_entry_id)
);

CREATE TABLE IF NOT EXISTS blindspots (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    entry_id    INTEGER NOT NULL REFERENCES entries(id),
    suggestion  TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT 'unset',
    created_at  TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Indexes for the discovery candidate scan and chart queries
const MIGRATION_V2_UP: &str = r#"
CREATE INDEX IF NOT EXISTS idx_entries_topic ON entries(topic_id);
CREATE INDEX IF NOT EXISTS idx_entries_created ON entries(created_at);
CREATE INDEX IF NOT EXISTS idx_entry_skills_skill ON entry_skills(skill_id);
CREATE INDEX IF NOT EXISTS idx_connections_source ON connections(source_entry_id);
CREATE INDEX IF NOT EXISTS idx_connections_target ON connections(target_entry_id);
CREATE INDEX IF NOT EXISTS idx_blindspots_entry ON blindspots(entry_id);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
