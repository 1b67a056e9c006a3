use crate::graph::{GraphEdge, GraphNode, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One failed fetch or lookup. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlError {
    /// SIREN of the entity, or person id for a failed mandate lookup.
    pub id: String,
    pub code: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl CrawlError {
    pub fn new(id: impl Into<String>, code: u16, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub scanned: usize,
    pub people_found: usize,
    pub edges_found: usize,
    pub cost_depth_reached: u32,
    pub errors: Vec<CrawlError>,
    /// Entity fetches that reached the data source.
    pub data_source_calls: usize,
    pub mandate_lookups: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// The work queue drained.
    Completed,
    /// The node budget stopped the run.
    BudgetReached,
    Cancelled,
}

impl CrawlOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlOutcome::Completed => "completed",
            CrawlOutcome::BudgetReached => "budget_reached",
            CrawlOutcome::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub root: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: CrawlStats,
    pub outcome: CrawlOutcome,
}

impl CrawlResult {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn root_node(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Root)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.target == id)
    }
}
