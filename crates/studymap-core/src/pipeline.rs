//! Entry Pipeline
//!
//! Orchestrates the enrichment sequence for one raw entry:
//! classify → resolve topic/skills → commit atomically → discover
//! connections → generate blindspots. Raw-entry capture always succeeds
//! when storage is healthy; every enrichment step is best-effort and can
//! only subtract enrichment, never the entry itself.

use std::sync::Arc;

use crate::discovery::discover_connections;
use crate::inference::{BlindspotClient, ClassificationClient, InferenceProvider};
use crate::model::{Blindspot, Classification, Connection, EntityKind, Entry};
use crate::storage::{Storage, StorageError};

/// Pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Bad input, rejected before any work
    #[error("Validation error: {0}")]
    Validation(String),
    /// Unrecoverable persistence fault
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An entry as committed, together with whatever enrichment succeeded
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedEntry {
    pub entry: Entry,
    pub connections: Vec<Connection>,
    pub blindspots: Vec<Blindspot>,
}

/// Outcome of an `enrich_missing` backfill run
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichReport {
    pub attempted: usize,
    pub enriched: usize,
}

/// The entry enrichment pipeline
pub struct Pipeline {
    storage: Arc<Storage>,
    classifier: ClassificationClient,
    blindspots: BlindspotClient,
}

impl Pipeline {
    pub fn new(
        storage: Arc<Storage>,
        provider: Arc<dyn InferenceProvider>,
        max_retries: u32,
    ) -> Self {
        Self {
            storage,
            classifier: ClassificationClient::new(provider.clone(), max_retries),
            blindspots: BlindspotClient::new(provider, max_retries),
        }
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Log one learning session and enrich it.
    ///
    /// Classification failure still creates the entry (NULL payload, no
    /// skill links). Discovery and blindspot trouble is logged and dropped.
    pub async fn log_entry(
        &self,
        topic_title: &str,
        summary: &str,
    ) -> Result<LoggedEntry, PipelineError> {
        let topic_title = topic_title.trim();
        let summary = summary.trim();
        if topic_title.is_empty() {
            return Err(PipelineError::Validation("topic title is empty".into()));
        }
        if summary.is_empty() {
            return Err(PipelineError::Validation("summary is empty".into()));
        }

        // Best-effort classification; the raw log must never wait on a
        // healthy inference service.
        let classification = match self.classifier.classify(topic_title, summary).await {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "classification failed, storing entry unenriched");
                None
            }
        };

        let topic_id = self.storage.resolve(EntityKind::Topic, topic_title)?;
        let skill_ids = match &classification {
            Some(c) => self.resolve_skills(&c.skills)?,
            None => Vec::new(),
        };

        let entry_id =
            self.storage
                .create_entry(topic_id, summary, classification.as_ref(), &skill_ids)?;
        tracing::info!(
            entry_id,
            classified = classification.is_some(),
            "entry logged"
        );

        // Entry is durable from here on; enrichment only adds.
        let connections = self.run_discovery(entry_id);
        let blindspots = match &classification {
            Some(c) => self.run_blindspots(entry_id, topic_title, summary, c).await,
            None => Vec::new(),
        };

        let entry = self
            .storage
            .get_entry(entry_id)?
            .ok_or_else(|| StorageError::NotFound(format!("entry {}", entry_id)))?;

        Ok(LoggedEntry {
            entry,
            connections,
            blindspots,
        })
    }

    /// Backfill classification for entries that never got one.
    ///
    /// Restricted to NULL payloads - classifications are written at most
    /// once. Pass explicit ids to limit the run, or None for every
    /// unclassified entry.
    pub async fn enrich_missing(
        &self,
        entry_ids: Option<Vec<i64>>,
    ) -> Result<EnrichReport, PipelineError> {
        let ids = match entry_ids {
            Some(ids) => ids,
            None => self.storage.unclassified_entry_ids()?,
        };

        let mut report = EnrichReport {
            attempted: ids.len(),
            enriched: 0,
        };

        for entry_id in ids {
            let Some(entry) = self.storage.get_entry(entry_id)? else {
                tracing::warn!(entry_id, "skipping backfill for missing entry");
                continue;
            };
            // Classified entries are out of scope before any inference
            // call is spent or any skill name resolved on their behalf.
            if entry.classification.is_some() {
                tracing::debug!(entry_id, "entry already classified, leaving untouched");
                continue;
            }

            let classification = match self
                .classifier
                .classify(&entry.topic_title, &entry.summary)
                .await
            {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(entry_id, error = %e, "backfill classification failed");
                    continue;
                }
            };

            let skill_ids = self.resolve_skills(&classification.skills)?;
            if !self
                .storage
                .backfill_classification(entry_id, &classification, &skill_ids)?
            {
                tracing::debug!(entry_id, "entry already classified, leaving untouched");
                continue;
            }

            self.run_discovery(entry_id);
            self.run_blindspots(entry_id, &entry.topic_title, &entry.summary, &classification)
                .await;
            report.enriched += 1;
        }

        tracing::info!(
            attempted = report.attempted,
            enriched = report.enriched,
            "backfill run complete"
        );
        Ok(report)
    }

    /// Resolve classified skill names, skipping blanks and duplicates
    fn resolve_skills(&self, names: &[String]) -> Result<Vec<i64>, StorageError> {
        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
                continue;
            }
            ids.push(self.storage.resolve(EntityKind::Skill, trimmed)?);
        }
        Ok(ids)
    }

    fn run_discovery(&self, entry_id: i64) -> Vec<Connection> {
        match discover_connections(&self.storage, entry_id) {
            Ok(edges) => edges,
            Err(e) => {
                tracing::warn!(entry_id, error = %e, "relationship discovery failed");
                Vec::new()
            }
        }
    }

    async fn run_blindspots(
        &self,
        entry_id: i64,
        topic_title: &str,
        summary: &str,
        classification: &Classification,
    ) -> Vec<Blindspot> {
        let suggestions = self
            .blindspots
            .generate(topic_title, summary, classification)
            .await;

        for s in &suggestions {
            if let Err(e) = self.storage.add_blindspot(entry_id, &s.suggestion, s.category) {
                tracing::warn!(entry_id, error = %e, "failed to persist blindspot");
            }
        }

        match self.storage.blindspots_for_entry(entry_id) {
            Ok(spots) => spots,
            Err(e) => {
                tracing::warn!(entry_id, error = %e, "failed to read back blindspots");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::ScriptedProvider;
    use crate::model::{BlindspotCategory, Complexity};
    use tempfile::TempDir;

    const CLS_CS: &str =
        r#"{"domain":"Computer Science","complexity":"intermediate","skills":["algorithms"],"concepts":["trees"]}"#;
    const SPOTS: &str =
        r#"{"blindspots":[{"suggestion":"Tree rotations","category":"prerequisite"}]}"#;

    fn pipeline_with(provider: ScriptedProvider) -> (TempDir, Pipeline) {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::new(Some(dir.path().join("test.db"))).unwrap());
        let pipeline = Pipeline::new(storage, Arc::new(provider), 2);
        (dir, pipeline)
    }

    #[tokio::test]
    async fn test_log_entry_full_enrichment() {
        let provider = ScriptedProvider::new(vec![
            Ok(CLS_CS.to_string()),
            Ok(SPOTS.to_string()),
        ]);
        let (_dir, pipeline) = pipeline_with(provider);

        let logged = pipeline
            .log_entry("Binary Search Trees", "Implemented insert and lookup")
            .await
            .unwrap();

        assert_eq!(logged.entry.topic_title, "Binary Search Trees");
        assert_eq!(logged.entry.skills, vec!["algorithms"]);
        let cls = logged.entry.classification.as_ref().unwrap();
        assert_eq!(cls.complexity, Complexity::Intermediate);
        assert_eq!(logged.blindspots.len(), 1);
        assert_eq!(logged.blindspots[0].category, BlindspotCategory::Prerequisite);
        // First entry has no corpus to connect against
        assert!(logged.connections.is_empty());
    }

    #[tokio::test]
    async fn test_log_entry_survives_total_inference_failure() {
        let (_dir, pipeline) = pipeline_with(ScriptedProvider::always_failing());

        let logged = pipeline
            .log_entry("Binary Search Trees", "Implemented insert")
            .await
            .unwrap();

        assert!(logged.entry.classification.is_none());
        assert!(logged.entry.skills.is_empty());
        assert!(logged.connections.is_empty());
        assert!(logged.blindspots.is_empty());

        // The raw entry is durable and readable
        let reread = pipeline
            .storage()
            .get_entry(logged.entry.id)
            .unwrap()
            .unwrap();
        assert_eq!(reread.summary, "Implemented insert");
    }

    #[tokio::test]
    async fn test_log_entry_rejects_blank_input() {
        let (_dir, pipeline) = pipeline_with(ScriptedProvider::always(CLS_CS));

        let err = pipeline.log_entry("   ", "summary").await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        let err = pipeline.log_entry("topic", "\n\t").await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(pipeline.storage().stats().unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_second_entry_connects_to_first() {
        let provider = ScriptedProvider::new(vec![
            // Entry A: classification + blindspots
            Ok(CLS_CS.to_string()),
            Ok(SPOTS.to_string()),
            // Entry B
            Ok(CLS_CS.to_string()),
            Ok(SPOTS.to_string()),
        ]);
        let (_dir, pipeline) = pipeline_with(provider);

        let a = pipeline
            .log_entry("Binary Search Trees", "Implemented insert and lookup")
            .await
            .unwrap();
        let b = pipeline
            .log_entry("AVL Trees", "Studied rotations for rebalancing")
            .await
            .unwrap();

        assert_eq!(b.connections.len(), 1);
        assert_eq!(b.connections[0].source_entry_id, b.entry.id);
        assert_eq!(b.connections[0].target_entry_id, a.entry.id);
        assert!(b.connections[0].strength > 0.3);
    }

    #[tokio::test]
    async fn test_enrich_missing_backfills_null_classifications_only() {
        // First entry is logged while inference is down
        let provider = ScriptedProvider::new(vec![
            Err(crate::inference::InferenceError::Timeout),
            Err(crate::inference::InferenceError::Timeout),
            Err(crate::inference::InferenceError::Timeout),
            // Backfill run: classification + blindspots
            Ok(CLS_CS.to_string()),
            Ok(SPOTS.to_string()),
        ]);
        let (_dir, pipeline) = pipeline_with(provider);

        let logged = pipeline
            .log_entry("Binary Search Trees", "Implemented insert")
            .await
            .unwrap();
        assert!(logged.entry.classification.is_none());

        let report = pipeline.enrich_missing(None).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.enriched, 1);

        let entry = pipeline
            .storage()
            .get_entry(logged.entry.id)
            .unwrap()
            .unwrap();
        assert!(entry.classification.is_some());
        assert_eq!(entry.skills, vec!["algorithms"]);

        // Nothing left to backfill; classified entries are never retouched
        let report = pipeline.enrich_missing(None).await.unwrap();
        assert_eq!(report.attempted, 0);
    }

    #[tokio::test]
    async fn test_enrich_missing_skips_classified_entries_without_inference() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::new(Some(dir.path().join("test.db"))).unwrap());
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(CLS_CS.to_string()),
            Ok(SPOTS.to_string()),
            // Would classify with a skill no entry should ever link
            Ok(r#"{"domain":"Computer Science","complexity":"beginner","skills":["phantom"],"concepts":[]}"#.to_string()),
        ]));
        let pipeline = Pipeline::new(storage, provider.clone(), 2);

        let logged = pipeline
            .log_entry("Binary Search Trees", "Implemented insert")
            .await
            .unwrap();
        assert!(logged.entry.classification.is_some());
        let skills_before = pipeline.storage().stats().unwrap().skills;
        let calls_before = provider.call_count();

        let report = pipeline
            .enrich_missing(Some(vec![logged.entry.id]))
            .await
            .unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.enriched, 0);
        // No-op entries spend no inference call and grow no skill rows
        assert_eq!(provider.call_count(), calls_before);
        assert_eq!(pipeline.storage().stats().unwrap().skills, skills_before);
    }
}
