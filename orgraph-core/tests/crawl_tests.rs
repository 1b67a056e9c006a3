// Tests for crawl orchestration

use orgraph_core::crawl::{
    build_source, execute_crawl, normalize_siren, CrawlOptions, CrawlProgressCallback, SourceMode,
};
use orgraph_scanner::graph::NodeKind;
use orgraph_scanner::result::CrawlOutcome;
use orgraph_scanner::{CancelToken, ScanError, DEMO_ROOT_SIREN};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn demo_options(root: &str, max_cost_depth: u32, max_nodes: usize) -> CrawlOptions {
    CrawlOptions {
        root_siren: root.to_string(),
        max_cost_depth,
        max_nodes,
        source: SourceMode::Demo { latency_ms: 0 },
        show_progress_bars: false,
    }
}

// ============================================================================
// SIREN Normalization Tests
// ============================================================================

#[test]
fn test_normalize_siren_strips_spaces() {
    assert_eq!(normalize_siren("443 061 841"), "443061841");
}

#[test]
fn test_normalize_siren_strips_tabs_and_newlines() {
    assert_eq!(normalize_siren(" 443\t061\n841 "), "443061841");
}

#[test]
fn test_normalize_siren_keeps_other_characters() {
    assert_eq!(normalize_siren("443-061-841"), "443-061-841");
}

// ============================================================================
// Source Construction Tests
// ============================================================================

#[test]
fn test_build_demo_source() {
    assert!(build_source(&SourceMode::Demo { latency_ms: 5 }).is_ok());
}

#[test]
fn test_build_live_source() {
    assert!(build_source(&SourceMode::live("secret")).is_ok());
}

#[test]
fn test_build_live_source_requires_key() {
    let result = build_source(&SourceMode::live("   "));
    assert!(matches!(result, Err(ScanError::Other(_))));
}

#[test]
fn test_build_live_source_rejects_bad_base_url() {
    let mode = SourceMode::Live {
        api_key: "secret".to_string(),
        base_url: "not a url".to_string(),
        timeout_secs: 5,
    };
    assert!(build_source(&mode).is_err());
}

// ============================================================================
// Execute Crawl Tests
// ============================================================================

#[tokio::test]
async fn test_execute_demo_crawl() {
    let result = execute_crawl(demo_options(DEMO_ROOT_SIREN, 1, 10), None, None)
        .await
        .unwrap();

    assert_eq!(result.root, DEMO_ROOT_SIREN);
    let root = result.root_node().unwrap();
    assert_eq!(root.label, "GOOGLE FRANCE");
    assert_eq!(root.kind, NodeKind::Root);
    assert!(result.stats.scanned <= 10);
    assert!(result.nodes.iter().all(|n| n.degree <= 1));
    assert!(result.stats.errors.is_empty());
}

#[tokio::test]
async fn test_execute_crawl_normalizes_root() {
    let result = execute_crawl(demo_options("443 061 841", 0, 1), None, None)
        .await
        .unwrap();

    assert_eq!(result.root, DEMO_ROOT_SIREN);
    assert_eq!(result.stats.scanned, 1);
}

#[tokio::test]
async fn test_execute_crawl_respects_node_budget() {
    let result = execute_crawl(demo_options(DEMO_ROOT_SIREN, 2, 3), None, None)
        .await
        .unwrap();

    assert_eq!(result.stats.scanned, 3);
    assert_eq!(result.outcome, CrawlOutcome::BudgetReached);
}

#[tokio::test]
async fn test_execute_crawl_rejects_malformed_root() {
    let result = execute_crawl(demo_options("44306184X", 1, 10), None, None).await;
    assert!(matches!(result, Err(ScanError::MalformedIdentifier(_))));
}

#[tokio::test]
async fn test_execute_crawl_cancelled_up_front() {
    let token = CancelToken::new();
    token.cancel();

    let result = execute_crawl(demo_options(DEMO_ROOT_SIREN, 2, 50), Some(token), None)
        .await
        .unwrap();

    assert_eq!(result.outcome, CrawlOutcome::Cancelled);
    assert!(result.nodes.is_empty());
    assert_eq!(result.stats.data_source_calls, 0);
}

#[tokio::test]
async fn test_execute_crawl_reports_progress() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let callback: CrawlProgressCallback = Arc::new(move |_stats| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });

    let result = execute_crawl(
        demo_options(DEMO_ROOT_SIREN, 1, 10),
        None,
        Some(callback),
    )
    .await
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), result.stats.data_source_calls);
}

#[tokio::test]
async fn test_execute_crawl_is_repeatable() {
    let first = execute_crawl(demo_options(DEMO_ROOT_SIREN, 1, 10), None, None)
        .await
        .unwrap();
    let second = execute_crawl(demo_options(DEMO_ROOT_SIREN, 1, 10), None, None)
        .await
        .unwrap();

    let ids = |r: &orgraph_scanner::CrawlResult| {
        let mut ids: Vec<_> = r.nodes.iter().map(|n| n.id.clone()).collect();
        ids.sort();
        ids
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.edges.len(), second.edges.len());
}
