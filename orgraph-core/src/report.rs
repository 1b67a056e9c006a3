// Report generation from crawl results

use crate::alerts::{
    find_alerted_companies, find_directors_at_risk, summarize, CompanyAlert, DirectorAtRisk,
    GraphSummary, Severity,
};
use chrono::{DateTime, Utc};
use orgraph_scanner::graph::{GraphEdge, GraphNode};
use orgraph_scanner::result::{CrawlError, CrawlOutcome, CrawlResult, CrawlStats};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

const BANNER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const RULE: &str = "────────────────────────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    fn from_alerts(alerts: &[CompanyAlert]) -> Self {
        let mut counts = SeverityCounts::default();
        for alert in alerts {
            match alert.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub session_id: String,
    pub root_siren: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_label: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub outcome: CrawlOutcome,
    pub stats: CrawlStats,
    pub summary: GraphSummary,
    pub severity_counts: SeverityCounts,
    pub alerts: Vec<CompanyAlert>,
    pub directors_at_risk: Vec<DirectorAtRisk>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

pub fn gather_report_data(result: &CrawlResult, root_siren: &str) -> ReportData {
    let alerts = find_alerted_companies(result);
    let severity_counts = SeverityCounts::from_alerts(&alerts);

    ReportData {
        session_id: uuid::Uuid::new_v4().to_string(),
        root_siren: root_siren.to_string(),
        root_label: result.root_node().map(|n| n.label.clone()),
        generated_at: Utc::now(),
        outcome: result.outcome,
        stats: result.stats.clone(),
        summary: summarize(result),
        severity_counts,
        alerts,
        directors_at_risk: find_directors_at_risk(result),
        nodes: result.nodes.clone(),
        edges: result.edges.clone(),
    }
}

// Helper functions
impl ReportData {
    fn outcome_to_string(&self) -> &'static str {
        match self.outcome {
            CrawlOutcome::Completed => "Completed",
            CrawlOutcome::BudgetReached => "Node budget reached",
            CrawlOutcome::Cancelled => "Cancelled",
        }
    }

    fn format_root(&self) -> String {
        match self.root_label {
            Some(ref label) => format!("{} ({})", label, self.root_siren),
            None => self.root_siren.clone(),
        }
    }
}

fn format_error(error: &CrawlError) -> String {
    let code = if error.code == 0 {
        "---".to_string()
    } else {
        error.code.to_string()
    };
    format!("{}  {}  {}", code, error.id, error.message)
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty()
            && current_line.chars().count() + word.chars().count() + 1 > width - indent.len()
        {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(BANNER);
    report.push_str("                        ORGRAPH OWNERSHIP CRAWL REPORT\n");
    report.push_str(BANNER);
    report.push('\n');

    report.push_str(&format!("Session ID:   {}\n", data.session_id));
    report.push_str(&format!("Root:         {}\n", data.format_root()));
    report.push_str(&format!("Status:       {}\n", data.outcome_to_string()));
    report.push_str(&format!(
        "Generated:    {}\n",
        data.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push('\n');

    // Executive Summary
    report.push_str(BANNER);
    report.push_str("EXECUTIVE SUMMARY\n");
    report.push_str(BANNER);
    report.push('\n');

    let summary = &data.summary;
    report.push_str(&format!("Entities scanned:   {}\n", data.stats.scanned));
    report.push_str(&format!(
        "Nodes:              {} ({} companies, {} people)\n",
        summary.total_nodes,
        summary.roots + summary.companies,
        summary.persons
    ));
    report.push_str(&format!(
        "Links:              {} ({} ownership, {} representation)\n",
        summary.total_edges, summary.free_edges, summary.costly_edges
    ));
    report.push_str(&format!(
        "Mandates:           {} active, {} ended\n",
        summary.active_mandates, summary.ended_mandates
    ));
    report.push_str(&format!(
        "Company status:     {} active, {} closed, {} unknown\n",
        summary.active, summary.closed, summary.unknown
    ));
    report.push_str(&format!(
        "Cost depth reached: {}\n",
        data.stats.cost_depth_reached
    ));
    report.push_str(&format!(
        "Source calls:       {} entities, {} mandate lookups\n",
        data.stats.data_source_calls, data.stats.mandate_lookups
    ));
    report.push('\n');

    report.push_str(&format!(
        "Companies Under Procedure: {}\n\n",
        data.severity_counts.total()
    ));
    if data.severity_counts.critical > 0 {
        report.push_str(&format!(
            "  [CRITICAL] {}  (Liquidation)\n",
            data.severity_counts.critical
        ));
    }
    if data.severity_counts.high > 0 {
        report.push_str(&format!(
            "  [HIGH]     {}  (Receivership)\n",
            data.severity_counts.high
        ));
    }
    if data.severity_counts.medium > 0 {
        report.push_str(&format!(
            "  [MEDIUM]   {}  (Safeguard or conciliation)\n",
            data.severity_counts.medium
        ));
    }
    if data.severity_counts.low > 0 {
        report.push_str(&format!(
            "  [LOW]      {}  (Other procedures)\n",
            data.severity_counts.low
        ));
    }
    report.push('\n');

    if !data.alerts.is_empty() {
        report.push_str(BANNER);
        report.push_str("ALERTED COMPANIES\n");
        report.push_str(BANNER);
        report.push('\n');

        for (idx, alert) in data.alerts.iter().enumerate() {
            report.push_str(&format!("[{}] {}\n", idx + 1, alert.label));
            report.push_str(&format!("SIREN:        {}\n", alert.id));
            report.push_str(&format!(
                "Severity:     {}\n",
                alert.severity.as_str().to_uppercase()
            ));
            report.push_str(&format!("Status:       {}\n", alert.status.as_str()));
            for procedure in &alert.procedures {
                report.push_str(&format!(
                    "Procedure:    {} (since {})\n",
                    procedure.kind,
                    procedure.start_date.as_deref().unwrap_or("unknown date")
                ));
            }
            if !alert.path.is_empty() {
                report.push_str("\nPath:\n");
                report.push_str(&wrap_text(&alert.path.render(), 80, "  "));
            }
            report.push('\n');
            report.push_str(RULE);
            report.push('\n');
        }
    }

    if !data.directors_at_risk.is_empty() {
        report.push_str(BANNER);
        report.push_str("DIRECTORS AT RISK\n");
        report.push_str(BANNER);
        report.push('\n');

        for director in &data.directors_at_risk {
            report.push_str(&format!("{}\n", director.label));
            for link in &director.companies {
                let state = if link.active { "" } else { " (ended)" };
                report.push_str(&format!(
                    "  - {} {}{}\n",
                    link.role, link.company_label, state
                ));
            }
            report.push('\n');
        }
    }

    if !data.stats.errors.is_empty() {
        report.push_str(BANNER);
        report.push_str("ERRORS\n");
        report.push_str(BANNER);
        report.push('\n');

        for error in &data.stats.errors {
            report.push_str(&format!("  {}\n", format_error(error)));
        }
        report.push('\n');
    }

    // Footer
    report.push_str(BANNER);
    report.push_str("                          End of Report\n");
    report.push_str(BANNER);
    report.push_str("\nGenerated by orgraph from public registry data.\n\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "orgraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": data.generated_at.to_rfc3339(),
                "format": "json"
            },
            "session": {
                "id": data.session_id,
                "root": data.root_siren,
                "root_label": data.root_label,
                "outcome": data.outcome
            },
            "summary": data.summary,
            "stats": data.stats,
            "severity_breakdown": data.severity_counts,
            "alerts": data.alerts,
            "directors_at_risk": data.directors_at_risk,
            "graph": {
                "nodes": data.nodes,
                "edges": data.edges
            }
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// One row per edge. The path is rendered with names only, `A > B > C`.
pub fn generate_csv_report(data: &ReportData) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["source", "target", "label", "active", "cost", "path"])?;

    for edge in &data.edges {
        let path = edge
            .path
            .steps()
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" > ");
        let active = if edge.active { "true" } else { "false" };
        writer.write_record([
            edge.source.as_str(),
            edge.target.as_str(),
            edge.label.as_str(),
            active,
            edge.cost.as_str(),
            path.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn md_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Ownership crawl: {}\n\n", md_cell(&data.format_root())));
    report.push_str(&format!("- **Session:** `{}`\n", data.session_id));
    report.push_str(&format!("- **Status:** {}\n", data.outcome_to_string()));
    report.push_str(&format!(
        "- **Generated:** {}\n\n",
        data.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    report.push_str("## Summary\n\n");
    report.push_str("| Metric | Value |\n|---|---|\n");
    let summary = &data.summary;
    let rows = [
        ("Entities scanned", data.stats.scanned),
        ("Companies", summary.roots + summary.companies),
        ("People", summary.persons),
        ("Ownership links", summary.free_edges),
        ("Representation links", summary.costly_edges),
        ("Active mandates", summary.active_mandates),
        ("Ended mandates", summary.ended_mandates),
        ("Companies under procedure", data.severity_counts.total()),
        ("Errors", data.stats.errors.len()),
    ];
    for (metric, value) in rows {
        report.push_str(&format!("| {} | {} |\n", metric, value));
    }
    report.push('\n');

    if !data.alerts.is_empty() {
        report.push_str("## Alerted companies\n\n");
        report.push_str("| Severity | Company | SIREN | Status | Procedures | Path |\n");
        report.push_str("|---|---|---|---|---|---|\n");
        for alert in &data.alerts {
            let procedures = alert
                .procedures
                .iter()
                .map(|p| p.kind.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                alert.severity.as_str(),
                md_cell(&alert.label),
                alert.id,
                alert.status.as_str(),
                md_cell(&procedures),
                md_cell(&alert.path.render())
            ));
        }
        report.push('\n');
    }

    if !data.directors_at_risk.is_empty() {
        report.push_str("## Directors at risk\n\n");
        for director in &data.directors_at_risk {
            report.push_str(&format!("- **{}**\n", md_cell(&director.label)));
            for link in &director.companies {
                let state = if link.active { "" } else { " _(ended)_" };
                report.push_str(&format!(
                    "  - {} of {}{}\n",
                    link.role, link.company_label, state
                ));
            }
        }
        report.push('\n');
    }

    if !data.stats.errors.is_empty() {
        report.push_str("## Errors\n\n");
        report.push_str("| Code | Id | Message |\n|---|---|---|\n");
        for error in &data.stats.errors {
            report.push_str(&format!(
                "| {} | {} | {} |\n",
                error.code,
                md_cell(&error.id),
                md_cell(&error.message)
            ));
        }
        report.push('\n');
    }

    report
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => Ok(generate_json_report(data)?),
        ReportFormat::Csv => generate_csv_report(data),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
