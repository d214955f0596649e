//! Classification client
//!
//! Asks the inference service for one JSON object describing an entry:
//! `{domain, complexity, skills, concepts}`. Shape problems coerce to safe
//! defaults; transport problems retry within the configured budget.

use std::sync::Arc;

use crate::model::Classification;

use super::{request_object, InferenceError, InferenceProvider};

/// Client for extracting structured attributes from an entry's free text
pub struct ClassificationClient {
    provider: Arc<dyn InferenceProvider>,
    max_retries: u32,
}

impl ClassificationClient {
    pub fn new(provider: Arc<dyn InferenceProvider>, max_retries: u32) -> Self {
        Self {
            provider,
            max_retries,
        }
    }

    /// Classify one entry. Returns a typed failure once the retry budget is
    /// spent; callers persist the raw entry either way.
    pub async fn classify(
        &self,
        topic_title: &str,
        summary: &str,
    ) -> Result<Classification, InferenceError> {
        let prompt = build_prompt(topic_title, summary);
        let value = request_object(&self.provider, &prompt, self.max_retries, "classification")
            .await?;
        Ok(Classification::from_value(&value))
    }
}

fn build_prompt(topic_title: &str, summary: &str) -> String {
    format!(
        r#"You are a learning-analytics assistant. The user just logged a study session.

**New entry:**
- Topic/Title: {topic_title}
- Summary: {summary}

Respond with ONLY valid JSON (no markdown fences, no explanation) matching this exact schema:
{{
  "domain": "<broad field, e.g. Software Engineering>",
  "complexity": "<beginner | intermediate | advanced>",
  "skills": ["<skill or tool the session exercised>"],
  "concepts": ["<key concept covered>"]
}}

Rules:
- Output ONLY the JSON object, nothing else.
- Keep skills and concepts short (1-4 words each)."#
    )
}

// ============================================================================
// TESTS
// ============================================================================
