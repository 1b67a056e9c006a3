pub mod alerts;
pub mod crawl;
pub mod report;

pub use alerts::{
    find_alerted_companies, find_directors_at_risk, summarize, CompanyAlert, DirectorAtRisk,
    GraphSummary, Severity,
};
pub use crawl::{build_source, execute_crawl, normalize_siren, CrawlOptions, SourceMode};
pub use report::{generate_report, ReportData, ReportError, ReportFormat};
