//! Inference Module
//!
//! Wraps the external text-completion service behind a capability trait so
//! the pipeline stays testable with a deterministic stub. Two clients sit on
//! top of the provider: classification (entry attributes) and blindspots
//! (gap suggestions). Both retry transient failures a bounded number of
//! times and tolerate prose/fences around the JSON the model was asked for.

mod blindspot;
mod classify;
mod provider;

pub use blindspot::BlindspotClient;
pub use classify::ClassificationClient;
pub use provider::{InferenceConfig, InferenceError, InferenceProvider, OllamaClient};

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

/// Request a JSON object from the provider, retrying transient failures.
///
/// A response with no extractable JSON object counts as transient: local
/// models routinely emit a well-formed object on a second attempt.
async fn request_object(
    provider: &Arc<dyn InferenceProvider>,
    prompt: &str,
    max_retries: u32,
    what: &str,
) -> Result<Value, InferenceError> {
    let mut last_error = String::new();

    for attempt in 0..=max_retries {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
        }

        match provider.complete(prompt).await {
            Ok(text) => match extract_first_object(&text) {
                Some(value) => return Ok(value),
                None => {
                    last_error = format!("no JSON object in {} response", what);
                    tracing::warn!(attempt, what, "response contained no JSON object");
                }
            },
            Err(e) => {
                last_error = e.to_string();
                tracing::warn!(attempt, what, error = %e, "inference attempt failed");
            }
        }
    }

    Err(InferenceError::Exhausted {
        attempts: max_retries + 1,
        last: last_error,
    })
}

/// Extract the first valid JSON object embedded in free-form model output.
///
/// Tolerates markdown fences, leading prose, and trailing prose.
fn extract_first_object(text: &str) -> Option<Value> {
    let stripped = strip_fences(text);
    for (idx, _) in stripped.char_indices().filter(|(_, c)| *c == '{') {
        let mut stream = serde_json::Deserializer::from_str(&stripped[idx..]).into_iter::<Value>();
        if let Some(Ok(value)) = stream.next() {
            if value.is_object() {
                return Some(value);
            }
        }
    }
    None
}

fn strip_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Drop the fence line itself (may carry a language tag)
        s = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

// ============================================================================
// TEST SUPPORT
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Deterministic provider that replays a scripted sequence of outcomes.
    /// Once the script runs out it keeps returning the final outcome.
    pub struct ScriptedProvider {
        script: Mutex<VecDeque<Result<String, InferenceError>>>,
        fallback: Result<String, InferenceError>,
        pub calls: Mutex<u32>,
    }

    impl ScriptedProvider {
        pub fn new(script: Vec<Result<String, InferenceError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: Err(InferenceError::Timeout),
                calls: Mutex::new(0),
            }
        }

        pub fn always(response: &str) -> Self {
            let mut p = Self::new(vec![]);
            p.fallback = Ok(response.to_string());
            p
        }

        pub fn always_failing() -> Self {
            Self::new(vec![])
        }

        pub fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl InferenceProvider for ScriptedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, InferenceError> {
            *self.calls.lock().unwrap() += 1;
            match self.script.lock().unwrap().pop_front() {
                Some(outcome) => outcome,
                None => match &self.fallback {
                    Ok(s) => Ok(s.clone()),
                    Err(InferenceError::Timeout) => Err(InferenceError::Timeout),
                    Err(e) => Err(InferenceError::RequestFailed(e.to_string())),
                },
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

    #[test]
    fn test_extract_plain_object() {
        let v = extract_first_object(r#"{"domain": "math"}"#).unwrap();
        assert_eq!(v["domain"], "math");
    }

    #[test]
    fn test_extract_object_wrapped_in_prose() {
        let text = r#"Sure! {"domain":"math","complexity":"ADVANCED","skills":["calculus"],"concepts":[]} Let me know if you need more."#;
        let v = extract_first_object(text).unwrap();
        assert_eq!(v["complexity"], "ADVANCED");
        assert_eq!(v["skills"][0], "calculus");
    }

    #[test]
    fn test_extract_skips_leading_braces_in_prose() {
        let text = "use {braces} carefully... {\"domain\": \"writing\"}";
        let v = extract_first_object(text).unwrap();
        assert_eq!(v["domain"], "writing");
    }

    #[test]
    fn test_extract_from_fenced_block() {
        let text = "```json\n{\"domain\": \"math\"}\n```";
        let v = extract_first_object(text).unwrap();
        assert_eq!(v["domain"], "math");
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(extract_first_object("no json here").is_none());
        assert!(extract_first_object("{not: valid").is_none());
        // A bare array is not the contract
        assert!(extract_first_object("[1, 2, 3]").is_none());
    }
}
