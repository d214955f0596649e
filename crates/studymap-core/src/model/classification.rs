//! Classification payload - what the inference service says about an entry
//!
//! The payload is stored verbatim (serialized JSON) next to the normalized
//! rows it was resolved into. Coercion is deliberately forgiving: a partially
//! well-formed response is strictly better than none.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// COMPLEXITY
// ============================================================================

/// Closed complexity scale for a learning session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Beginner => "beginner",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        }
    }

    /// Parse case-insensitively; unknown values fall back to beginner
    pub fn parse_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "intermediate" => Complexity::Intermediate,
            "advanced" => Complexity::Advanced,
            _ => Complexity::Beginner,
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Structured attributes extracted from an entry's free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Broad field, e.g. "Software Engineering"
    pub domain: String,
    pub complexity: Complexity,
    /// Skills/tools the session exercised
    pub skills: Vec<String>,
    /// Key concepts covered
    pub concepts: Vec<String>,
}

impl Classification {
    /// Coerce a loosely-shaped JSON object into a Classification.
    ///
    /// Missing or wrong-typed fields become safe defaults instead of
    /// failing the whole entry. Non-string list elements are dropped.
    pub fn from_value(value: &Value) -> Self {
        let domain = value
            .get("domain")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let complexity = value
            .get("complexity")
            .and_then(Value::as_str)
            .map(Complexity::parse_name)
            .unwrap_or_default();

        Self {
            domain,
            complexity,
            skills: string_list(value.get("skills")),
            concepts: string_list(value.get("concepts")),
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================
