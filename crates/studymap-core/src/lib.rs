//! # Study Map Core
//!
//! Learning-journal enrichment engine. A raw free-text study entry flows
//! through one pipeline:
//!
//! - **Classification**: an external inference service (Ollama-compatible)
//!   extracts `{domain, complexity, skills, concepts}` from the entry text
//! - **Entity resolution**: topic and skill names dedupe into canonical
//!   rows under a trim+casefold uniqueness rule
//! - **Atomic capture**: entry + classification payload + skill links
//!   commit as one unit; a failed classification still captures the entry
//! - **Relationship discovery**: a deterministic lexical heuristic scores
//!   the new entry against the corpus and persists weighted edges
//! - **Blindspot generation**: a secondary inference call proposes
//!   prerequisite/adjacent/deeper-dive gaps, best-effort
//! - **Aggregation**: read-only chart datasets and the node/edge graph
//!   payload for the front end
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use studymap_core::{InferenceConfig, OllamaClient, Pipeline, Storage};
//!
//! let storage = Arc::new(Storage::new(None)?);
//! let config = InferenceConfig::from_env();
//! let retries = config.max_retries;
//! let provider = Arc::new(OllamaClient::new(config));
//!
//! let pipeline = Pipeline::new(storage, provider, retries);
//! let logged = pipeline.log_entry("AVL Trees", "Studied rotations").await?;
//! println!("entry #{} with {} connections", logged.entry.id, logged.connections.len());
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod analytics;
pub mod discovery;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Model types
pub use model::{
    Blindspot, BlindspotCategory, BlindspotSuggestion, Classification, Complexity, Connection,
    EntityKind, Entry, ReferenceEntity,
};

// Storage layer
pub use storage::{Result, Storage, StorageError, StoreStats};

// Inference clients
pub use inference::{
    BlindspotClient, ClassificationClient, InferenceConfig, InferenceError, InferenceProvider,
    OllamaClient,
};

// Pipeline
pub use pipeline::{EnrichReport, LoggedEntry, Pipeline, PipelineError};

// Discovery
pub use discovery::{discover_connections, MIN_STRENGTH};

// Aggregation
pub use analytics::{
    analytics_summary, graph_payload, AnalyticsSummary, ChartSeries, GraphEdge, GraphNode,
    GraphPayload,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        analytics_summary, graph_payload, Classification, Complexity, EntityKind, Entry,
        InferenceConfig, InferenceProvider, LoggedEntry, OllamaClient, Pipeline, PipelineError,
        Result, Storage, StorageError,
    };
}
