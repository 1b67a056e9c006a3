pub mod crawler;
pub mod demo;
pub mod error;
pub mod graph;
pub mod handle;
pub mod pappers;
pub mod record;
pub mod result;
pub mod risk;
pub mod source;

pub use crawler::{Crawler, ProgressCallback};
pub use demo::{DemoSource, DEMO_ROOT_SIREN};
pub use error::ScanError;
pub use graph::{GraphEdge, GraphNode, LinkCost, NodeKind, NodeStatus, PathStep, RelationPath};
pub use handle::{CancelToken, CrawlHandle};
pub use pappers::PappersClient;
pub use record::EntityRecord;
pub use result::{CrawlError, CrawlOutcome, CrawlResult, CrawlStats};
pub use source::EntitySource;
