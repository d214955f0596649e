//! Relationship Discovery
//!
//! Compares a newly committed entry against the existing corpus and persists
//! scored connection edges. The score is a deterministic local heuristic -
//! no inference call - so discovery is idempotent and testable offline:
//!
//! `strength = 0.5 * skill_overlap + 0.2 * domain_match + 0.3 * text_similarity`
//!
//! Skill overlap uses the overlap coefficient (|A∩B| / min(|A|,|B|)) so an
//! entry whose skills are fully contained in another's scores 1.0 on that
//! term. Candidates are bounded to classified entries sharing at least one
//! skill or the same domain; pairs with neither are never scored.

use std::collections::HashSet;

use crate::model::{Connection, Entry};
use crate::storage::{Result, Storage, StorageError};

/// Edges scoring below this are discarded, not persisted
pub const MIN_STRENGTH: f64 = 0.3;

const SKILL_WEIGHT: f64 = 0.5;
const DOMAIN_WEIGHT: f64 = 0.2;
const TEXT_WEIGHT: f64 = 0.3;

/// Comparison profile distilled from a classified entry
struct Profile {
    entry_id: i64,
    skills: HashSet<String>,
    domain: String,
    tokens: HashSet<String>,
}

impl Profile {
    /// None for entries that never got a classification - they have nothing
    /// to compare on and are skipped by discovery.
    fn from_entry(entry: &Entry) -> Option<Self> {
        let classification = entry.classification.as_ref()?;
        Some(Self {
            entry_id: entry.id,
            skills: entry
                .skills
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
            domain: classification.domain.trim().to_lowercase(),
            tokens: tokenize(&entry.summary),
        })
    }

    fn shares_anything_with(&self, other: &Profile) -> bool {
        (!self.domain.is_empty() && self.domain == other.domain)
            || self.skills.intersection(&other.skills).next().is_some()
    }
}

/// Discover and persist connections for one entry against the corpus.
///
/// The new entry is always the edge source. Idempotent: edges upsert on the
/// (source, target) key and the score is deterministic, so re-running
/// against an unchanged corpus leaves the edge set unchanged. Returns the
/// edges originating from the entry after this run.
pub fn discover_connections(storage: &Storage, entry_id: i64) -> Result<Vec<Connection>> {
    let entry = storage
        .get_entry(entry_id)?
        .ok_or_else(|| StorageError::NotFound(format!("entry {}", entry_id)))?;

    let Some(profile) = Profile::from_entry(&entry) else {
        tracing::debug!(entry_id, "entry has no classification, skipping discovery");
        return Ok(Vec::new());
    };

    let mut persisted = 0usize;
    for other in storage.list_entries()? {
        if other.id == entry.id {
            continue;
        }
        let Some(candidate) = Profile::from_entry(&other) else {
            continue;
        };
        if !profile.shares_anything_with(&candidate) {
            continue;
        }

        let strength = pair_strength(&profile, &candidate);
        if strength < MIN_STRENGTH {
            continue;
        }

        storage.upsert_connection(
            entry.id,
            candidate.entry_id,
            &pair_label(&profile, &candidate),
            strength,
        )?;
        persisted += 1;
    }

    tracing::info!(entry_id, edges = persisted, "relationship discovery complete");

    let edges = storage
        .connections_for_entry(entry_id)?
        .into_iter()
        .filter(|c| c.source_entry_id == entry_id)
        .collect();
    Ok(edges)
}

/// Weighted pair score, clamped into [0.0, 1.0]
fn pair_strength(a: &Profile, b: &Profile) -> f64 {
    let skill_term = overlap_coefficient(&a.skills, &b.skills);
    let domain_term = if !a.domain.is_empty() && a.domain == b.domain {
        1.0
    } else {
        0.0
    };
    let text_term = jaccard(&a.tokens, &b.tokens);

    (SKILL_WEIGHT * skill_term + DOMAIN_WEIGHT * domain_term + TEXT_WEIGHT * text_term)
        .clamp(0.0, 1.0)
}

/// Short label naming the dominant shared attribute
fn pair_label(a: &Profile, b: &Profile) -> String {
    let mut shared: Vec<&String> = a.skills.intersection(&b.skills).collect();
    shared.sort();
    if let Some(skill) = shared.first() {
        return format!("shared skill: {}", skill);
    }
    if !a.domain.is_empty() && a.domain == b.domain {
        return format!("same domain: {}", a.domain);
    }
    "related notes".to_string()
}

fn overlap_coefficient(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / smaller as f64
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Lowercased alphanumeric words of 3+ chars
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3)
        .map(str::to_string)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
