//! SQLite Storage Implementation
//!
//! Core storage layer for the learning journal. Uses separate reader/writer
//! connections for interior mutability; all methods take `&self`, making
//! `Storage` `Send + Sync` so callers can share an `Arc<Storage>`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{
    Blindspot, BlindspotCategory, Classification, Connection as ConnectionEdge, EntityKind, Entry,
    ReferenceEntity,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Bad input rejected before touching the database
    #[error("Validation error: {0}")]
    Validation(String),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Stored classification payload failed to parse
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Row counts for the sidebar/health surfaces
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub entries: i64,
    pub topics: i64,
    pub skills: i64,
    pub connections: i64,
    pub blindspots: i64,
}

/// Normalized comparison form: trim + casefold. Used for uniqueness only;
/// the originally-cased trimmed string is what gets stored.
pub(crate) fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StorageError::InvalidTimestamp(s.to_string()))
}

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage struct
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl Storage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Create new storage instance
    ///
    /// With no explicit path the database lives in the platform data
    /// directory (e.g. `~/.local/share/studymap/studymap.db`).
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "studymap", "studymap").ok_or_else(
                    || StorageError::Init("Could not determine project directories".to_string()),
                )?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("studymap.db")
            }
        };

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
        })
    }

    fn writer(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    fn reader(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    // ========================================================================
    // ENTITY RESOLVER
    // ========================================================================

    /// Resolve a free-text topic/skill name to its canonical row id,
    /// creating the row on first encounter.
    ///
    /// Race-safe: the uniqueness constraint on the normalized column plus
    /// "insert on conflict do nothing, then re-read" means two pipelines
    /// resolving the same name concurrently converge on one row.
    pub fn resolve(&self, kind: EntityKind, raw: &str) -> Result<i64> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(StorageError::Validation(format!(
                "{} name is empty after trimming",
                kind
            )));
        }
        let norm = normalize(display);

        let (insert_sql, select_sql) = match kind {
            EntityKind::Topic => (
                "INSERT INTO topics (title, title_norm, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(title_norm) DO NOTHING",
                "SELECT id FROM topics WHERE title_norm = ?1",
            ),
            EntityKind::Skill => (
                "INSERT INTO skills (name, name_norm, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name_norm) DO NOTHING",
                "SELECT id FROM skills WHERE name_norm = ?1",
            ),
        };

        let writer = self.writer()?;
        writer.execute(insert_sql, params![display, norm, Utc::now().to_rfc3339()])?;
        let id = writer.query_row(select_sql, params![norm], |row| row.get(0))?;
        Ok(id)
    }

    /// List all canonical rows of one kind, newest first
    pub fn list_reference_entities(&self, kind: EntityKind) -> Result<Vec<ReferenceEntity>> {
        let sql = match kind {
            EntityKind::Topic => {
                "SELECT id, title, created_at FROM topics ORDER BY created_at DESC, id DESC"
            }
            EntityKind::Skill => {
                "SELECT id, name, created_at FROM skills ORDER BY created_at DESC, id DESC"
            }
        };
        let reader = self.reader()?;
        let mut stmt = reader.prepare(sql)?;
        let rows: Vec<(i64, String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<_>>()?;
        drop(stmt);
        drop(reader);

        rows.into_iter()
            .map(|(id, name, created_at)| {
                Ok(ReferenceEntity {
                    id,
                    name,
                    created_at: parse_ts(&created_at)?,
                })
            })
            .collect()
    }

    // ========================================================================
    // ENTRIES
    // ========================================================================

    /// Persist an entry with its classification payload and skill links as
    /// one atomic unit. A reader either sees the entry with all of its
    /// links or nothing.
    pub fn create_entry(
        &self,
        topic_id: i64,
        summary: &str,
        classification: Option<&Classification>,
        skill_ids: &[i64],
    ) -> Result<i64> {
        let payload = classification.map(serde_json::to_string).transpose()?;
        let now = Utc::now().to_rfc3339();

        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        tx.execute(
            "INSERT INTO entries (topic_id, summary, classification, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![topic_id, summary, payload, now],
        )?;
        let entry_id = tx.last_insert_rowid();
        for skill_id in skill_ids {
            tx.execute(
                "INSERT OR IGNORE INTO entry_skills (entry_id, skill_id) VALUES (?1, ?2)",
                params![entry_id, skill_id],
            )?;
        }
        tx.commit()?;

        tracing::debug!(entry_id, skills = skill_ids.len(), "entry persisted");
        Ok(entry_id)
    }

    /// Backfill a NULL classification (and its skill links) on an existing
    /// entry. Returns false if the entry already has a classification -
    /// payloads are written at most once and never overwritten.
    pub fn backfill_classification(
        &self,
        entry_id: i64,
        classification: &Classification,
        skill_ids: &[i64],
    ) -> Result<bool> {
        let payload = serde_json::to_string(classification)?;

        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        let changed = tx.execute(
            "UPDATE entries SET classification = ?1 WHERE id = ?2 AND classification IS NULL",
            params![payload, entry_id],
        )?;
        if changed == 0 {
            return Ok(false);
        }
        for skill_id in skill_ids {
            tx.execute(
                "INSERT OR IGNORE INTO entry_skills (entry_id, skill_id) VALUES (?1, ?2)",
                params![entry_id, skill_id],
            )?;
        }
        tx.commit()?;
        Ok(true)
    }

    /// Get a single entry with its topic title and skill names
    pub fn get_entry(&self, entry_id: i64) -> Result<Option<Entry>> {
        let raw = {
            let reader = self.reader()?;
            reader
                .query_row(
                    "SELECT e.id, e.topic_id, t.title, e.summary, e.classification, e.created_at
                     FROM entries e JOIN topics t ON t.id = e.topic_id
                     WHERE e.id = ?1",
                    params![entry_id],
                    |row| {
                        Ok(RawEntry {
                            id: row.get(0)?,
                            topic_id: row.get(1)?,
                            topic_title: row.get(2)?,
                            summary: row.get(3)?,
                            classification: row.get(4)?,
                            created_at: row.get(5)?,
                        })
                    },
                )
                .optional()?
        };

        match raw {
            None => Ok(None),
            Some(raw) => {
                let skills = self.skills_by_entry()?.remove(&entry_id).unwrap_or_default();
                Ok(Some(raw.into_entry(skills)?))
            }
        }
    }

    /// List all entries (newest first) with topic titles and skill names
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let raws: Vec<RawEntry> = {
            let reader = self.reader()?;
            let mut stmt = reader.prepare(
                "SELECT e.id, e.topic_id, t.title, e.summary, e.classification, e.created_at
                 FROM entries e JOIN topics t ON t.id = e.topic_id
                 ORDER BY e.created_at DESC, e.id DESC",
            )?;
            let raws = stmt
                .query_map([], |row| {
                    Ok(RawEntry {
                        id: row.get(0)?,
                        topic_id: row.get(1)?,
                        topic_title: row.get(2)?,
                        summary: row.get(3)?,
                        classification: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<rusqlite::Result<_>>()?;
            raws
        };

        let mut skills = self.skills_by_entry()?;
        raws.into_iter()
            .map(|raw| {
                let entry_skills = skills.remove(&raw.id).unwrap_or_default();
                raw.into_entry(entry_skills)
            })
            .collect()
    }

    /// Ids of entries still awaiting a classification payload
    pub fn unclassified_entry_ids(&self) -> Result<Vec<i64>> {
        let reader = self.reader()?;
        let mut stmt =
            reader.prepare("SELECT id FROM entries WHERE classification IS NULL ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(ids)
    }

    /// Skill names keyed by entry id, for joining onto entry listings
    fn skills_by_entry(&self) -> Result<HashMap<i64, Vec<String>>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT es.entry_id, s.name
             FROM entry_skills es JOIN skills s ON s.id = es.skill_id
             ORDER BY s.name",
        )?;
        let rows: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;

        let mut map: HashMap<i64, Vec<String>> = HashMap::new();
        for (entry_id, name) in rows {
            map.entry(entry_id).or_default().push(name);
        }
        Ok(map)
    }

    // ========================================================================
    // CONNECTIONS
    // ========================================================================

    /// Upsert a directed connection edge.
    ///
    /// Keyed on (source, target): re-running discovery against an unchanged
    /// corpus replaces identical edges instead of duplicating them. Strength
    /// is clamped into [0.0, 1.0] before persistence.
    pub fn upsert_connection(
        &self,
        source_entry_id: i64,
        target_entry_id: i64,
        relationship: &str,
        strength: f64,
    ) -> Result<()> {
        if source_entry_id == target_entry_id {
            return Err(StorageError::Validation(format!(
                "connection would self-loop on entry {}",
                source_entry_id
            )));
        }
        let strength = strength.clamp(0.0, 1.0);

        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO connections
                 (source_entry_id, target_entry_id, relationship, strength, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(source_entry_id, target_entry_id)
             DO UPDATE SET relationship = excluded.relationship,
                           strength = excluded.strength",
            params![
                source_entry_id,
                target_entry_id,
                relationship,
                strength,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// All connection edges
    pub fn list_connections(&self) -> Result<Vec<ConnectionEdge>> {
        self.query_connections(
            "SELECT id, source_entry_id, target_entry_id, relationship, strength, created_at
             FROM connections ORDER BY id",
            params![],
        )
    }

    /// Edges touching one entry, in either direction
    pub fn connections_for_entry(&self, entry_id: i64) -> Result<Vec<ConnectionEdge>> {
        self.query_connections(
            "SELECT id, source_entry_id, target_entry_id, relationship, strength, created_at
             FROM connections
             WHERE source_entry_id = ?1 OR target_entry_id = ?1
             ORDER BY id",
            params![entry_id],
        )
    }

    fn query_connections(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<ConnectionEdge>> {
        let rows: Vec<(i64, i64, i64, String, f64, String)> = {
            let reader = self.reader()?;
            let mut stmt = reader.prepare(sql)?;
            let rows = stmt
                .query_map(params, |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                })?
                .collect::<rusqlite::Result<_>>()?;
            rows
        };

        rows.into_iter()
            .map(
                |(id, source_entry_id, target_entry_id, relationship, strength, created_at)| {
                    Ok(ConnectionEdge {
                        id,
                        source_entry_id,
                        target_entry_id,
                        relationship,
                        strength,
                        created_at: parse_ts(&created_at)?,
                    })
                },
            )
            .collect()
    }

    // ========================================================================
    // BLINDSPOTS
    // ========================================================================

    /// Persist one blindspot suggestion attributed to an entry
    pub fn add_blindspot(
        &self,
        entry_id: i64,
        suggestion: &str,
        category: BlindspotCategory,
    ) -> Result<i64> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO blindspots (entry_id, suggestion, category, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry_id,
                suggestion,
                category.as_str(),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(writer.last_insert_rowid())
    }

    /// All blindspots, newest first
    pub fn list_blindspots(&self) -> Result<Vec<Blindspot>> {
        self.query_blindspots(
            "SELECT id, entry_id, suggestion, category, created_at
             FROM blindspots ORDER BY created_at DESC, id DESC",
            params![],
        )
    }

    /// Blindspots attributed to one entry
    pub fn blindspots_for_entry(&self, entry_id: i64) -> Result<Vec<Blindspot>> {
        self.query_blindspots(
            "SELECT id, entry_id, suggestion, category, created_at
             FROM blindspots WHERE entry_id = ?1 ORDER BY id",
            params![entry_id],
        )
    }

    fn query_blindspots(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Blindspot>> {
        let rows: Vec<(i64, i64, String, String, String)> = {
            let reader = self.reader()?;
            let mut stmt = reader.prepare(sql)?;
            let rows = stmt
                .query_map(params, |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                })?
                .collect::<rusqlite::Result<_>>()?;
            rows
        };

        rows.into_iter()
            .map(|(id, entry_id, suggestion, category, created_at)| {
                Ok(Blindspot {
                    id,
                    entry_id,
                    suggestion,
                    category: BlindspotCategory::parse_name(&category),
                    created_at: parse_ts(&created_at)?,
                })
            })
            .collect()
    }

    // ========================================================================
    // STATS
    // ========================================================================

    /// Row counts across all six tables' public faces
    pub fn stats(&self) -> Result<StoreStats> {
        let reader = self.reader()?;
        let count = |table: &str| -> Result<i64> {
            Ok(reader.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?)
        };
        Ok(StoreStats {
            entries: count("entries")?,
            topics: count("topics")?,
            skills: count("skills")?,
            connections: count("connections")?,
            blindspots: count("blindspots")?,
        })
    }
}

/// Row as read from `entries` before timestamp/payload decoding
struct RawEntry {
    id: i64,
    topic_id: i64,
    topic_title: String,
    summary: String,
    classification: Option<String>,
    created_at: String,
}

impl RawEntry {
    fn into_entry(self, skills: Vec<String>) -> Result<Entry> {
        let classification = self
            .classification
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(Entry {
            id: self.id,
            topic_id: self.topic_id,
            topic_title: self.topic_title,
            summary: self.summary,
            classification,
            skills,
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Complexity;
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(Some(dir.path().join("test.db"))).unwrap();
        (dir, storage)
    }

    fn sample_classification() -> Classification {
        Classification {
            domain: "Computer Science".to_string(),
            complexity: Complexity::Intermediate,
            skills: vec!["algorithms".to_string()],
            concepts: vec!["trees".to_string()],
        }
    }

    #[test]
    fn test_resolve_is_idempotent_across_variants() {
        let (_dir, storage) = test_storage();

        let a = storage.resolve(EntityKind::Topic, "Binary Search Trees").unwrap();
        let b = storage.resolve(EntityKind::Topic, "  binary search trees ").unwrap();
        let c = storage.resolve(EntityKind::Topic, "BINARY SEARCH TREES").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);

        let topics = storage.list_reference_entities(EntityKind::Topic).unwrap();
        assert_eq!(topics.len(), 1);
        // First-seen casing wins
        assert_eq!(topics[0].name, "Binary Search Trees");
    }

    #[test]
    fn test_resolve_namespaces_are_independent() {
        let (_dir, storage) = test_storage();
        let topic = storage.resolve(EntityKind::Topic, "Rust").unwrap();
        let skill = storage.resolve(EntityKind::Skill, "Rust").unwrap();
        // Same name, separate tables; both start at rowid 1
        assert_eq!(topic, 1);
        assert_eq!(skill, 1);
        assert_eq!(storage.list_reference_entities(EntityKind::Skill).unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_rejects_blank_names() {
        let (_dir, storage) = test_storage();
        let err = storage.resolve(EntityKind::Skill, "   ").unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_create_entry_links_exactly_one_topic() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let skill_id = storage.resolve(EntityKind::Skill, "algorithms").unwrap();

        let cls = sample_classification();
        let entry_id = storage
            .create_entry(topic_id, "Learned BFS and DFS", Some(&cls), &[skill_id])
            .unwrap();

        let entry = storage.get_entry(entry_id).unwrap().unwrap();
        assert_eq!(entry.topic_id, topic_id);
        assert_eq!(entry.topic_title, "Graphs");
        assert_eq!(entry.skills, vec!["algorithms"]);
        assert_eq!(entry.classification.unwrap(), cls);
    }

    #[test]
    fn test_create_entry_without_classification() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let entry_id = storage
            .create_entry(topic_id, "unenriched session", None, &[])
            .unwrap();

        let entry = storage.get_entry(entry_id).unwrap().unwrap();
        assert!(entry.classification.is_none());
        assert!(entry.skills.is_empty());
    }

    #[test]
    fn test_backfill_classification_writes_at_most_once() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let entry_id = storage.create_entry(topic_id, "raw", None, &[]).unwrap();
        let skill_id = storage.resolve(EntityKind::Skill, "algorithms").unwrap();

        let cls = sample_classification();
        assert!(storage
            .backfill_classification(entry_id, &cls, &[skill_id])
            .unwrap());
        // Second attempt must refuse to overwrite
        assert!(!storage
            .backfill_classification(entry_id, &Classification::default(), &[])
            .unwrap());

        let entry = storage.get_entry(entry_id).unwrap().unwrap();
        assert_eq!(entry.classification.unwrap(), cls);
        assert_eq!(entry.skills, vec!["algorithms"]);
    }

    #[test]
    fn test_connection_upsert_is_idempotent() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let a = storage.create_entry(topic_id, "a", None, &[]).unwrap();
        let b = storage.create_entry(topic_id, "b", None, &[]).unwrap();

        storage.upsert_connection(a, b, "shared skill: algorithms", 0.6).unwrap();
        storage.upsert_connection(a, b, "shared skill: algorithms", 0.6).unwrap();

        let edges = storage.list_connections().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].strength, 0.6);
    }

    #[test]
    fn test_connection_strength_clamped() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let a = storage.create_entry(topic_id, "a", None, &[]).unwrap();
        let b = storage.create_entry(topic_id, "b", None, &[]).unwrap();

        storage.upsert_connection(a, b, "overflow", 1.7).unwrap();
        storage.upsert_connection(b, a, "underflow", -0.2).unwrap();

        for edge in storage.list_connections().unwrap() {
            assert!((0.0..=1.0).contains(&edge.strength));
        }
    }

    #[test]
    fn test_connection_rejects_self_loop() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let a = storage.create_entry(topic_id, "a", None, &[]).unwrap();

        let err = storage.upsert_connection(a, a, "loop", 0.5).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_blindspots_round_trip() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let entry_id = storage.create_entry(topic_id, "a", None, &[]).unwrap();

        storage
            .add_blindspot(entry_id, "Study heaps", BlindspotCategory::Prerequisite)
            .unwrap();
        storage
            .add_blindspot(entry_id, "Look at tries", BlindspotCategory::Adjacent)
            .unwrap();

        let spots = storage.blindspots_for_entry(entry_id).unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].category, BlindspotCategory::Prerequisite);

        let stats = storage.stats().unwrap();
        assert_eq!(stats.blindspots, 2);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_unclassified_entry_ids() {
        let (_dir, storage) = test_storage();
        let topic_id = storage.resolve(EntityKind::Topic, "Graphs").unwrap();
        let raw = storage.create_entry(topic_id, "raw", None, &[]).unwrap();
        let cls = sample_classification();
        let _enriched = storage
            .create_entry(topic_id, "enriched", Some(&cls), &[])
            .unwrap();

        assert_eq!(storage.unclassified_entry_ids().unwrap(), vec![raw]);
    }
}
