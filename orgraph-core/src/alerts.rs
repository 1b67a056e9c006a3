// Risk analysis over a finished crawl graph

use orgraph_scanner::graph::{GraphNode, LinkCost, NodeKind, NodeStatus, RelationPath};
use orgraph_scanner::record::CollectiveProcedure;
use orgraph_scanner::result::CrawlResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered most serious first, so sorting ascending puts critical alerts on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Severity of a single procedure, judged from its kind.
    pub fn for_procedure(kind: &str) -> Self {
        let kind = kind.to_lowercase();
        if kind.contains("liquidation") {
            Severity::Critical
        } else if kind.contains("redressement") || kind.contains("receivership") {
            Severity::High
        } else if [
            "sauvegarde",
            "safeguard",
            "conciliation",
            "surveillance",
            "administration judiciaire",
            "court supervision",
        ]
        .iter()
        .any(|k| kind.contains(k))
        {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn for_procedures(procedures: &[CollectiveProcedure]) -> Self {
        procedures
            .iter()
            .map(|p| Severity::for_procedure(&p.kind))
            .min()
            .unwrap_or(Severity::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyAlert {
    pub id: String,
    pub label: String,
    pub status: NodeStatus,
    pub severity: Severity,
    pub procedures: Vec<CollectiveProcedure>,
    /// How the crawl reached this company.
    pub path: RelationPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLink {
    pub company_id: String,
    pub company_label: String,
    pub role: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorAtRisk {
    pub id: String,
    pub label: String,
    pub companies: Vec<RiskLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub roots: usize,
    pub companies: usize,
    pub persons: usize,
    pub active: usize,
    pub closed: usize,
    pub unknown: usize,
    pub free_edges: usize,
    pub costly_edges: usize,
    pub active_mandates: usize,
    pub ended_mandates: usize,
    pub alerted_companies: usize,
}

fn is_alerted(node: &GraphNode) -> bool {
    node.kind.is_company() && (node.has_alert || !node.procedures.is_empty())
}

fn provenance(result: &CrawlResult, id: &str) -> RelationPath {
    result
        .edges_to(id)
        .next()
        .or_else(|| result.edges_from(id).next())
        .map(|e| e.path.clone())
        .unwrap_or_default()
}

/// Companies under a collective procedure, most serious first. Ties keep crawl order.
pub fn find_alerted_companies(result: &CrawlResult) -> Vec<CompanyAlert> {
    let mut alerts: Vec<CompanyAlert> = result
        .nodes
        .iter()
        .filter(|n| is_alerted(n))
        .map(|n| CompanyAlert {
            id: n.id.clone(),
            label: n.label.clone(),
            status: n.status,
            severity: Severity::for_procedures(&n.procedures),
            procedures: n.procedures.clone(),
            path: provenance(result, &n.id),
        })
        .collect();

    alerts.sort_by_key(|a| a.severity);
    alerts
}

/// People holding, or having held, a mandate in at least one alerted company.
pub fn find_directors_at_risk(result: &CrawlResult) -> Vec<DirectorAtRisk> {
    let alerted: HashSet<&str> = result
        .nodes
        .iter()
        .filter(|n| is_alerted(n))
        .map(|n| n.id.as_str())
        .collect();

    result
        .nodes_of_kind(NodeKind::Person)
        .filter_map(|person| {
            let mut seen = HashSet::new();
            let companies: Vec<RiskLink> = result
                .edges
                .iter()
                .filter_map(|e| {
                    let other = if e.source == person.id {
                        &e.target
                    } else if e.target == person.id {
                        &e.source
                    } else {
                        return None;
                    };
                    if !alerted.contains(other.as_str()) || !seen.insert(other.clone()) {
                        return None;
                    }
                    let company_label = result
                        .node(other)
                        .map(|n| n.label.clone())
                        .unwrap_or_else(|| other.clone());
                    Some(RiskLink {
                        company_id: other.clone(),
                        company_label,
                        role: e.label.clone(),
                        active: e.active,
                    })
                })
                .collect();

            if companies.is_empty() {
                None
            } else {
                Some(DirectorAtRisk {
                    id: person.id.clone(),
                    label: person.label.clone(),
                    companies,
                })
            }
        })
        .collect()
}

pub fn summarize(result: &CrawlResult) -> GraphSummary {
    let mut summary = GraphSummary {
        total_nodes: result.nodes.len(),
        total_edges: result.edges.len(),
        ..Default::default()
    };

    for node in &result.nodes {
        match node.kind {
            NodeKind::Root => summary.roots += 1,
            NodeKind::Company => summary.companies += 1,
            NodeKind::Person => summary.persons += 1,
        }
        match node.status {
            NodeStatus::Active => summary.active += 1,
            NodeStatus::Closed => summary.closed += 1,
            NodeStatus::Unknown => summary.unknown += 1,
        }
        if is_alerted(node) {
            summary.alerted_companies += 1;
        }
    }

    for edge in &result.edges {
        match edge.cost {
            LinkCost::Free => summary.free_edges += 1,
            // Costly edges are the representation and mandate links
            LinkCost::Costly if edge.active => {
                summary.costly_edges += 1;
                summary.active_mandates += 1;
            }
            LinkCost::Costly => {
                summary.costly_edges += 1;
                summary.ended_mandates += 1;
            }
        }
    }

    summary
}
