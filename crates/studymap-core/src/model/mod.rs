//! Data model - Core types for the learning journal
//!
//! Six relational entities (topics, skills, entries, entry_skills,
//! connections, blindspots) plus the denormalized classification payload
//! the inference service produces for each entry.

mod classification;

pub use classification::{Classification, Complexity};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// REFERENCE ENTITIES
// ============================================================================

/// Discriminator for the two canonical reference namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Study subject an entry is filed under
    Topic,
    /// Skill or tool an entry exercised
    Skill,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Topic => "topic",
            EntityKind::Skill => "skill",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A canonical topic or skill row
///
/// Created on first encounter of a normalized name, never mutated or
/// deleted. Multiple entries point at the same row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntity {
    pub id: i64,
    /// Originally-cased, trimmed name as first seen
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// ENTRIES
// ============================================================================

/// One logged learning session
///
/// Immutable after creation except for `classification`, which the
/// pipeline writes at most once and never overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: i64,
    pub topic_id: i64,
    /// Joined topic title for display
    pub topic_title: String,
    /// Free-text session summary as the user wrote it
    pub summary: String,
    /// What the inference service said, verbatim; display/audit artifact.
    /// The normalized skill links are the source of truth for joins.
    pub classification: Option<Classification>,
    /// Canonical skill names linked through entry_skills
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// CONNECTIONS
// ============================================================================

/// A directed, strength-weighted edge between two entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: i64,
    pub source_entry_id: i64,
    pub target_entry_id: i64,
    /// Short label naming the dominant shared attribute
    pub relationship: String,
    /// Always within [0.0, 1.0]
    pub strength: f64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// BLINDSPOTS
// ============================================================================

/// Why a blindspot suggestion matters relative to its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlindspotCategory {
    /// Foundation the entry seems to assume
    Prerequisite,
    /// Neighboring topic worth a look
    Adjacent,
    /// Same topic, further down
    DeeperDive,
    /// Model gave no usable category
    #[default]
    Unset,
}

impl BlindspotCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlindspotCategory::Prerequisite => "prerequisite",
            BlindspotCategory::Adjacent => "adjacent",
            BlindspotCategory::DeeperDive => "deeper-dive",
            BlindspotCategory::Unset => "unset",
        }
    }

    /// Parse loosely from model output; anything unrecognized is Unset
    pub fn parse_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "prerequisite" => BlindspotCategory::Prerequisite,
            "adjacent" => BlindspotCategory::Adjacent,
            "deeper-dive" | "deeper dive" | "deeper_dive" => BlindspotCategory::DeeperDive,
            _ => BlindspotCategory::Unset,
        }
    }
}

impl std::fmt::Display for BlindspotCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A suggested gap relative to an entry's classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blindspot {
    pub id: i64,
    pub entry_id: i64,
    pub suggestion: String,
    pub category: BlindspotCategory,
    pub created_at: DateTime<Utc>,
}

/// An unpersisted suggestion as returned by the inference service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlindspotSuggestion {
    pub suggestion: String,
    pub category: BlindspotCategory,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blindspot_category_roundtrip() {
        for cat in [
            BlindspotCategory::Prerequisite,
            BlindspotCategory::Adjacent,
            BlindspotCategory::DeeperDive,
            BlindspotCategory::Unset,
        ] {
            assert_eq!(BlindspotCategory::parse_name(cat.as_str()), cat);
        }
    }

    #[test]
    fn test_blindspot_category_lenient_parse() {
        assert_eq!(
            BlindspotCategory::parse_name("  Deeper Dive "),
            BlindspotCategory::DeeperDive
        );
        assert_eq!(
            BlindspotCategory::parse_name("PREREQUISITE"),
            BlindspotCategory::Prerequisite
        );
        assert_eq!(
            BlindspotCategory::parse_name("because it helps"),
            BlindspotCategory::Unset
        );
    }
}
