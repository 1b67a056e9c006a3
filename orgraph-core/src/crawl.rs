use indicatif::{ProgressBar, ProgressStyle};
use orgraph_scanner::error::ScanError;
use orgraph_scanner::pappers::DEFAULT_BASE_URL;
use orgraph_scanner::record::is_valid_siren;
use orgraph_scanner::result::{CrawlResult, CrawlStats};
use orgraph_scanner::{CancelToken, Crawler, DemoSource, EntitySource, PappersClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub root_siren: String,
    pub max_cost_depth: u32,
    pub max_nodes: usize,
    pub source: SourceMode,
    pub show_progress_bars: bool,
}

/// Where entity records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    /// Deterministic offline registry
    Demo { latency_ms: u64 },
    /// Pappers API
    Live {
        api_key: String,
        base_url: String,
        timeout_secs: u64,
    },
}

impl SourceMode {
    pub fn live(api_key: impl Into<String>) -> Self {
        SourceMode::Live {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceMode::Demo { .. } => "demo",
            SourceMode::Live { .. } => "pappers",
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(CrawlStats) + Send + Sync>;

/// Removes all whitespace, so `443 061 841` becomes `443061841`.
pub fn normalize_siren(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn build_source(mode: &SourceMode) -> Result<Arc<dyn EntitySource>, ScanError> {
    match mode {
        SourceMode::Demo { latency_ms } => Ok(Arc::new(
            DemoSource::new().with_latency(Duration::from_millis(*latency_ms)),
        )),
        SourceMode::Live {
            api_key,
            base_url,
            timeout_secs,
        } => {
            if api_key.trim().is_empty() {
                return Err(ScanError::Other("An API key is required".to_string()));
            }
            Ok(Arc::new(PappersClient::with_options(
                api_key.trim(),
                base_url,
                *timeout_secs,
            )?))
        }
    }
}

fn progress_message(stats: &CrawlStats) -> String {
    format!(
        "Crawling... {} entities scanned, {} people, {} links (depth {})",
        stats.scanned, stats.people_found, stats.edges_found, stats.cost_depth_reached
    )
}

/// Execute a crawl with the given options
///
/// A malformed root identifier is rejected before any call is made.
/// Cancelling `cancel` stops the crawl before its next fetch and the partial
/// graph is returned.
pub async fn execute_crawl(
    options: CrawlOptions,
    cancel: Option<CancelToken>,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlResult, ScanError> {
    let CrawlOptions {
        root_siren,
        max_cost_depth,
        max_nodes,
        source,
        show_progress_bars,
    } = options;

    let root_siren = normalize_siren(&root_siren);
    if !is_valid_siren(&root_siren) {
        return Err(ScanError::MalformedIdentifier(root_siren));
    }

    let entity_source = build_source(&source)?;
    debug!("Using {} data source", source.name());

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Starting crawl of {}...", root_siren));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let internal_progress_callback: CrawlProgressCallback = Arc::new(move |stats: CrawlStats| {
        if let Some(ref pb) = pb_clone {
            pb.set_message(progress_message(&stats));
        }
        if let Some(ref callback) = progress_callback {
            callback(stats);
        }
    });

    let mut crawler = Crawler::new(entity_source)
        .with_max_cost_depth(max_cost_depth)
        .with_max_nodes(max_nodes)
        .with_progress_callback(internal_progress_callback);
    if let Some(token) = cancel {
        crawler = crawler.with_cancel_token(token);
    }

    let handle = crawler.start(root_siren);
    let result = handle.result().await?;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl {}! {} entities scanned, {} nodes, {} links",
            result.outcome.as_str(),
            result.stats.scanned,
            result.nodes.len(),
            result.edges.len()
        ));
    }
    info!(
        "Crawl of {} finished with {} errors",
        result.root,
        result.stats.errors.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_message() {
        let stats = CrawlStats {
            scanned: 4,
            people_found: 2,
            edges_found: 7,
            cost_depth_reached: 1,
            ..Default::default()
        };
        assert_eq!(
            progress_message(&stats),
            "Crawling... 4 entities scanned, 2 people, 7 links (depth 1)"
        );
    }

    #[test]
    fn test_source_mode_names() {
        assert_eq!(SourceMode::Demo { latency_ms: 0 }.name(), "demo");
        assert_eq!(SourceMode::live("key").name(), "pappers");
    }
}
