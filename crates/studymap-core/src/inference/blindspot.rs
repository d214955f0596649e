//! Blindspot client
//!
//! Secondary inference call proposing gaps relative to a classified entry.
//! Advisory only: every failure path degrades to an empty suggestion list.

use std::sync::Arc;

use serde_json::Value;

use crate::model::{BlindspotCategory, BlindspotSuggestion, Classification};

use super::{request_object, InferenceProvider};

/// Client for deriving gap suggestions from an entry's classification
pub struct BlindspotClient {
    provider: Arc<dyn InferenceProvider>,
    max_retries: u32,
}

impl BlindspotClient {
    pub fn new(provider: Arc<dyn InferenceProvider>, max_retries: u32) -> Self {
        Self {
            provider,
            max_retries,
        }
    }

    /// Generate 0-N suggestions for one entry. Never fails: inference
    /// trouble logs a warning and yields an empty list.
    pub async fn generate(
        &self,
        topic_title: &str,
        summary: &str,
        classification: &Classification,
    ) -> Vec<BlindspotSuggestion> {
        let prompt = build_prompt(topic_title, summary, classification);
        match request_object(&self.provider, &prompt, self.max_retries, "blindspots").await {
            Ok(value) => parse_suggestions(&value),
            Err(e) => {
                tracing::warn!(error = %e, "blindspot generation degraded to empty");
                Vec::new()
            }
        }
    }
}

fn build_prompt(topic_title: &str, summary: &str, classification: &Classification) -> String {
    format!(
        r#"You are a learning-analytics assistant. Given a study session, suggest gaps the learner should explore next.

**Entry:**
- Topic/Title: {topic_title}
- Domain: {domain}
- Complexity: {complexity}
- Key concepts: {concepts}
- Summary: {summary}

Respond with ONLY valid JSON (no markdown fences, no explanation) matching this exact schema:
{{
  "blindspots": [
    {{
      "suggestion": "<a topic or concept the user should explore next>",
      "category": "<prerequisite | adjacent | deeper-dive>"
    }}
  ]
}}

Rules:
- Provide 2-5 suggestions.
- Keep each suggestion concise (< 15 words).
- Output ONLY the JSON object, nothing else."#,
        domain = classification.domain,
        complexity = classification.complexity,
        concepts = classification.concepts.join(", "),
    )
}

fn parse_suggestions(value: &Value) -> Vec<BlindspotSuggestion> {
    value
        .get("blindspots")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let suggestion = item.get("suggestion")?.as_str()?.trim().to_string();
                    if suggestion.is_empty() {
                        return None;
                    }
                    let category = item
                        .get("category")
                        .and_then(Value::as_str)
                        .map(BlindspotCategory::parse_name)
                        .unwrap_or_default();
                    Some(BlindspotSuggestion {
                        suggestion,
                        category,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::ScriptedProvider;

    fn classification() -> Classification {
        Classification {
            domain: "Computer Science".into(),
            complexity: crate::model::Complexity::Intermediate,
            skills: vec!["algorithms".into()],
            concepts: vec!["binary trees".into()],
        }
    }

    #[tokio::test]
    async fn test_generate_parses_suggestions() {
        let provider = Arc::new(ScriptedProvider::always(
            r#"{"blindspots": [
                {"suggestion": "Tree rotations", "category": "prerequisite"},
                {"suggestion": "B-trees", "category": "adjacent"},
                {"suggestion": "Amortized analysis", "category": "because reasons"}
            ]}"#,
        ));
        let client = BlindspotClient::new(provider, 1);

        let spots = client.generate("AVL Trees", "Balancing", &classification()).await;
        assert_eq!(spots.len(), 3);
        assert_eq!(spots[0].category, BlindspotCategory::Prerequisite);
        assert_eq!(spots[1].category, BlindspotCategory::Adjacent);
        // Unknown category text parses to unset rather than failing
        assert_eq!(spots[2].category, BlindspotCategory::Unset);
    }

    #[tokio::test]
    async fn test_generate_degrades_to_empty_on_failure() {
        let provider = Arc::new(ScriptedProvider::always_failing());
        let client = BlindspotClient::new(provider, 1);

        let spots = client.generate("AVL Trees", "Balancing", &classification()).await;
        assert!(spots.is_empty());
    }

    #[tokio::test]
    async fn test_generate_ignores_blank_and_shapeless_items() {
        let provider = Arc::new(ScriptedProvider::always(
            r#"{"blindspots": [{"suggestion": "  "}, {"category": "adjacent"}, "plain string",
                {"suggestion": "Recursion schemes"}]}"#,
        ));
        let client = BlindspotClient::new(provider, 0);

        let spots = client.generate("AVL Trees", "Balancing", &classification()).await;
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].suggestion, "Recursion schemes");
        assert_eq!(spots[0].category, BlindspotCategory::Unset);
    }
}
