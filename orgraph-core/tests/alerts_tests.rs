// Tests for risk analysis over crawl graphs

mod common;

use common::{sample_result, DOE, LIQUIDATED, RECEIVERSHIP, ROE, ROOT};
use orgraph_core::alerts::{find_alerted_companies, find_directors_at_risk, summarize, Severity};
use orgraph_scanner::graph::NodeStatus;
use orgraph_scanner::record::CollectiveProcedure;
use orgraph_scanner::result::{CrawlOutcome, CrawlResult, CrawlStats};

// ============================================================================
// Severity Tests
// ============================================================================

#[test]
fn test_severity_for_procedure_kinds() {
    assert_eq!(
        Severity::for_procedure("Liquidation judiciaire"),
        Severity::Critical
    );
    assert_eq!(
        Severity::for_procedure("Redressement judiciaire"),
        Severity::High
    );
    assert_eq!(
        Severity::for_procedure("Procédure de sauvegarde"),
        Severity::Medium
    );
    assert_eq!(Severity::for_procedure("Conciliation"), Severity::Medium);
    assert_eq!(Severity::for_procedure("Plan de cession"), Severity::Low);
}

#[test]
fn test_severity_picks_most_serious_procedure() {
    let procedures = vec![
        CollectiveProcedure {
            kind: "Procédure de sauvegarde".to_string(),
            start_date: None,
            end_date: None,
        },
        CollectiveProcedure {
            kind: "LIQUIDATION JUDICIAIRE".to_string(),
            start_date: None,
            end_date: None,
        },
    ];
    assert_eq!(Severity::for_procedures(&procedures), Severity::Critical);
    assert_eq!(Severity::for_procedures(&[]), Severity::Low);
}

#[test]
fn test_severity_ordering() {
    let mut severities = vec![
        Severity::Low,
        Severity::Critical,
        Severity::Medium,
        Severity::High,
    ];
    severities.sort();
    assert_eq!(
        severities,
        vec![
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low
        ]
    );
    assert_eq!(Severity::High.as_str(), "high");
}

// ============================================================================
// Alerted Company Tests
// ============================================================================

#[test]
fn test_alerted_companies_sorted_by_severity() {
    let alerts = find_alerted_companies(&sample_result());

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].id, LIQUIDATED);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].status, NodeStatus::Closed);
    assert_eq!(alerts[1].id, RECEIVERSHIP);
    assert_eq!(alerts[1].severity, Severity::High);
}

#[test]
fn test_alert_path_comes_from_first_incoming_edge() {
    let alerts = find_alerted_companies(&sample_result());

    assert_eq!(alerts[0].path.render(), "ROOT CO > (Président) BETA, SARL");
    assert_eq!(alerts[1].path.render(), "ROOT CO > (Président) ALPHA SAS");
}

#[test]
fn test_alert_path_falls_back_to_outgoing_edge() {
    let mut result = sample_result();
    // Neither the root nor the liquidated company keeps an incoming edge
    result
        .edges
        .retain(|e| e.target != LIQUIDATED && e.target != ROOT);
    let first_out = result.edges.iter().find(|e| e.source == ROOT).cloned();
    for node in result.nodes.iter_mut() {
        if node.id == ROOT {
            node.has_alert = true;
        }
    }

    let alerts = find_alerted_companies(&result);
    let root_alert = alerts.iter().find(|a| a.id == ROOT).unwrap();
    assert_eq!(Some(root_alert.path.clone()), first_out.map(|e| e.path));

    let orphan = alerts.iter().find(|a| a.id == LIQUIDATED).unwrap();
    assert!(orphan.path.is_empty());
}

#[test]
fn test_people_are_never_alerted() {
    let mut result = sample_result();
    for node in result.nodes.iter_mut() {
        if node.id == DOE {
            node.has_alert = true;
        }
    }

    let alerts = find_alerted_companies(&result);
    assert!(alerts.iter().all(|a| a.id != DOE));
}

#[test]
fn test_no_alerts_on_clean_graph() {
    let result = CrawlResult {
        root: ROOT.to_string(),
        nodes: Vec::new(),
        edges: Vec::new(),
        stats: CrawlStats::default(),
        outcome: CrawlOutcome::Completed,
    };

    assert!(find_alerted_companies(&result).is_empty());
    assert!(find_directors_at_risk(&result).is_empty());
}

// ============================================================================
// Directors At Risk Tests
// ============================================================================

#[test]
fn test_directors_at_risk() {
    let directors = find_directors_at_risk(&sample_result());

    assert_eq!(directors.len(), 1);
    let doe = &directors[0];
    assert_eq!(doe.id, DOE);
    assert_eq!(doe.label, "John DOE");

    let ids: Vec<_> = doe.companies.iter().map(|c| c.company_id.as_str()).collect();
    assert_eq!(ids, vec![RECEIVERSHIP, LIQUIDATED]);
    assert_eq!(doe.companies[0].role, "Gérant");
    assert!(!doe.companies[0].active);
    assert_eq!(doe.companies[1].company_label, "BETA, SARL");
}

#[test]
fn test_directors_at_risk_lists_each_company_once() {
    let mut result = sample_result();
    let duplicate = result
        .edges
        .iter()
        .find(|e| e.source == DOE && e.target == LIQUIDATED)
        .cloned()
        .unwrap();
    result.edges.push(duplicate);

    let directors = find_directors_at_risk(&result);
    assert_eq!(directors[0].companies.len(), 2);
}

#[test]
fn test_person_without_alerted_links_is_not_at_risk() {
    let directors = find_directors_at_risk(&sample_result());
    assert!(directors.iter().all(|d| d.id != ROE));
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summarize_counts() {
    let summary = summarize(&sample_result());

    assert_eq!(summary.total_nodes, 6);
    assert_eq!(summary.total_edges, 6);
    assert_eq!(summary.roots, 1);
    assert_eq!(summary.companies, 3);
    assert_eq!(summary.persons, 2);
    assert_eq!(summary.active, 4);
    assert_eq!(summary.closed, 1);
    assert_eq!(summary.unknown, 1);
    assert_eq!(summary.free_edges, 2);
    assert_eq!(summary.costly_edges, 4);
    assert_eq!(summary.active_mandates, 3);
    assert_eq!(summary.ended_mandates, 1);
    assert_eq!(summary.alerted_companies, 2);
}
