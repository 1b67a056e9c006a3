// Hand-built crawl graph shared by the analysis and report tests
#![allow(dead_code)]

use orgraph_scanner::graph::{
    GraphEdge, GraphNode, LinkCost, NodeKind, NodeStatus, PathStep, RelationPath, SourceRecord,
};
use orgraph_scanner::record::{CollectiveProcedure, EntitySummary};
use orgraph_scanner::result::{CrawlError, CrawlOutcome, CrawlResult, CrawlStats};

pub const ROOT: &str = "100000000";
pub const RECEIVERSHIP: &str = "200000000";
pub const LIQUIDATED: &str = "300000000";
pub const PLACEHOLDER: &str = "400000000";
pub const DOE: &str = "DOE_JOHN_UNK";
pub const ROE: &str = "ROE_JANE_UNK";

fn node(id: &str, label: &str, kind: NodeKind, status: NodeStatus, degree: u32) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        label: label.to_string(),
        kind,
        status,
        data: SourceRecord::Summary(EntitySummary::default()),
        degree,
        has_alert: false,
        procedures: Vec::new(),
    }
}

fn procedure(kind: &str) -> CollectiveProcedure {
    CollectiveProcedure {
        kind: kind.to_string(),
        start_date: Some("2023-05-15".to_string()),
        end_date: None,
    }
}

fn edge(
    source: &str,
    target: &str,
    label: &str,
    active: bool,
    path: &RelationPath,
    cost: LinkCost,
) -> GraphEdge {
    GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
        label: label.to_string(),
        active,
        path: path.clone(),
        cost,
    }
}

/// Root owning two companies in trouble; one director sits on the root and both of them.
pub fn sample_result() -> CrawlResult {
    let mut receivership = node(
        RECEIVERSHIP,
        "ALPHA SAS",
        NodeKind::Company,
        NodeStatus::Active,
        0,
    );
    receivership.has_alert = true;
    receivership.procedures = vec![procedure("Redressement judiciaire")];

    let mut liquidated = node(
        LIQUIDATED,
        "BETA, SARL",
        NodeKind::Company,
        NodeStatus::Closed,
        0,
    );
    liquidated.has_alert = true;
    liquidated.procedures = vec![procedure("Liquidation judiciaire")];

    let nodes = vec![
        node(ROOT, "ROOT CO", NodeKind::Root, NodeStatus::Active, 0),
        receivership,
        liquidated,
        node(PLACEHOLDER, "GAMMA", NodeKind::Company, NodeStatus::Unknown, 1),
        node(DOE, "John DOE", NodeKind::Person, NodeStatus::Active, 1),
        node(ROE, "Jane ROE", NodeKind::Person, NodeStatus::Active, 1),
    ];

    let root = RelationPath::empty().extended(PathStep::new("ROOT CO", NodeKind::Root, None));
    let step = |path: &RelationPath, name: &str, kind: NodeKind, rel: &str| {
        path.extended(PathStep::new(name, kind, Some(rel.to_string())))
    };
    let to_alpha = step(&root, "ALPHA SAS", NodeKind::Company, "Président");
    let to_beta = step(&root, "BETA, SARL", NodeKind::Company, "Président");
    let doe = step(&root, "John DOE", NodeKind::Person, "Président");

    let doe_alpha = step(&to_alpha, "John DOE", NodeKind::Person, "Gérant");
    let doe_beta = step(&doe, "BETA, SARL", NodeKind::Company, "Mandate holder");
    let roe_gamma = step(&root, "GAMMA", NodeKind::Company, "Mandate holder");

    let edges = vec![
        edge(ROOT, RECEIVERSHIP, "Président", true, &to_alpha, LinkCost::Free),
        edge(ROOT, LIQUIDATED, "Président", true, &to_beta, LinkCost::Free),
        edge(DOE, ROOT, "Président", true, &doe, LinkCost::Costly),
        edge(DOE, RECEIVERSHIP, "Gérant", false, &doe_alpha, LinkCost::Costly),
        edge(DOE, LIQUIDATED, "Mandate holder", true, &doe_beta, LinkCost::Costly),
        edge(ROE, PLACEHOLDER, "Mandate holder", true, &roe_gamma, LinkCost::Costly),
    ];

    CrawlResult {
        root: ROOT.to_string(),
        stats: CrawlStats {
            scanned: 3,
            people_found: 2,
            edges_found: edges.len(),
            cost_depth_reached: 1,
            errors: vec![CrawlError::new(PLACEHOLDER, 404, "Not Found")],
            data_source_calls: 4,
            mandate_lookups: 2,
        },
        nodes,
        edges,
        outcome: CrawlOutcome::Completed,
    }
}
