//! Aggregation Reader
//!
//! Read-only queries feeding the charts and the graph canvas. Everything
//! here reflects committed state only and never mutates; an empty store
//! yields empty datasets, not errors.
//!
//! Normalized rows (entry_skills, topics) drive the joins; the stored
//! classification payload is consulted only for its display attributes
//! (domain, complexity), never re-normalized.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::Complexity;
use crate::storage::{Result, Storage};

/// How many skills the frequency ranking keeps
const TOP_SKILLS: usize = 10;

/// Parallel label/value arrays, shaped for the charting front end
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

/// The four chart datasets
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Entries per day, labels ascending
    pub activity: ChartSeries,
    /// Skill frequency ranking (top 10)
    pub skills: ChartSeries,
    /// Entries per complexity level
    pub complexity: ChartSeries,
    /// Entries per classified domain
    pub domains: ChartSeries,
}

/// Node in the visualization graph: an entry or a skill hub
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<&'static str>,
}

/// Edge in the visualization graph
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

/// Node/edge payload for the graph canvas
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPayload {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Build the four chart datasets from committed state
pub fn analytics_summary(storage: &Storage) -> Result<AnalyticsSummary> {
    let entries = storage.list_entries()?;

    // Activity by day, ascending
    let mut by_day: HashMap<String, i64> = HashMap::new();
    for entry in &entries {
        *by_day
            .entry(entry.created_at.date_naive().to_string())
            .or_default() += 1;
    }
    let mut days: Vec<String> = by_day.keys().cloned().collect();
    days.sort();
    let activity = ChartSeries {
        values: days.iter().map(|d| by_day[d]).collect(),
        labels: days,
    };

    // Skill frequency, top N, count descending then name for stable output
    let mut skill_counts: HashMap<String, i64> = HashMap::new();
    for entry in &entries {
        for skill in &entry.skills {
            *skill_counts.entry(skill.clone()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(String, i64)> = skill_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_SKILLS);
    let skills = ChartSeries {
        labels: ranked.iter().map(|(name, _)| name.clone()).collect(),
        values: ranked.iter().map(|(_, count)| *count).collect(),
    };

    // Complexity distribution in scale order, only levels that occur
    let mut by_complexity: HashMap<Complexity, i64> = HashMap::new();
    let mut by_domain: HashMap<String, i64> = HashMap::new();
    for entry in &entries {
        if let Some(cls) = &entry.classification {
            *by_complexity.entry(cls.complexity).or_default() += 1;
            let domain = cls.domain.trim();
            if !domain.is_empty() {
                *by_domain.entry(domain.to_string()).or_default() += 1;
            }
        }
    }
    let mut complexity = ChartSeries::default();
    for level in [
        Complexity::Beginner,
        Complexity::Intermediate,
        Complexity::Advanced,
    ] {
        if let Some(count) = by_complexity.get(&level) {
            complexity.labels.push(level.as_str().to_string());
            complexity.values.push(*count);
        }
    }

    let mut domain_ranked: Vec<(String, i64)> = by_domain.into_iter().collect();
    domain_ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let domains = ChartSeries {
        labels: domain_ranked.iter().map(|(name, _)| name.clone()).collect(),
        values: domain_ranked.iter().map(|(_, count)| *count).collect(),
    };

    Ok(AnalyticsSummary {
        activity,
        skills,
        complexity,
        domains,
    })
}

/// Build the node/edge payload for the graph canvas: entries and skill hubs
/// as nodes, skill membership and discovered connections as edges.
pub fn graph_payload(storage: &Storage) -> Result<GraphPayload> {
    let entries = storage.list_entries()?;
    let connections = storage.list_connections()?;

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut seen_skills: HashSet<String> = HashSet::new();

    for entry in &entries {
        nodes.push(GraphNode {
            id: format!("entry_{}", entry.id),
            label: format!("#{}: {}", entry.id, entry.topic_title),
            kind: "entry",
            complexity: entry
                .classification
                .as_ref()
                .map(|c| c.complexity.as_str()),
        });

        for skill in &entry.skills {
            let key = skill.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            if seen_skills.insert(key.clone()) {
                nodes.push(GraphNode {
                    id: format!("skill_{}", key),
                    label: skill.clone(),
                    kind: "skill",
                    complexity: None,
                });
            }
            edges.push(GraphEdge {
                from: format!("entry_{}", entry.id),
                to: format!("skill_{}", key),
                label: None,
                strength: None,
            });
        }
    }

    for c in &connections {
        edges.push(GraphEdge {
            from: format!("entry_{}", c.source_entry_id),
            to: format!("entry_{}", c.target_entry_id),
            label: Some(c.relationship.clone()),
            strength: Some(c.strength),
        });
    }

    Ok(GraphPayload { nodes, edges })
}

// ============================================================================
// TESTS
// ============================================================================
