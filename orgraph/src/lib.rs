// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    expand_output_path, parse_siren_arg, resolve_source_mode, run_crawl, CrawlRequest,
};

// Re-export crawl functionality from orgraph-core
pub use orgraph_core::crawl::{execute_crawl, normalize_siren, CrawlOptions, SourceMode};
