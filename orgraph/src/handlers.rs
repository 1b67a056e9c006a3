use anyhow::{anyhow, Context};
use clap::ArgMatches;
use colored::Colorize;
use orgraph_core::crawl::{execute_crawl, normalize_siren, CrawlOptions, SourceMode};
use orgraph_core::report::{gather_report_data, generate_report, save_report, ReportFormat};
use orgraph_scanner::record::is_valid_siren;
use orgraph_scanner::result::{CrawlOutcome, CrawlResult};
use orgraph_scanner::CancelToken;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// Helper functions for crawl handler

/// Normalize a user-supplied SIREN and check it is nine digits
pub fn parse_siren_arg(input: &str) -> Result<String, String> {
    let siren = normalize_siren(input);
    if is_valid_siren(&siren) {
        Ok(siren)
    } else {
        Err(format!(
            "'{}' is not a valid SIREN (expected 9 digits)",
            input.trim()
        ))
    }
}

/// Pick the data source from the command-line flags
pub fn resolve_source_mode(
    demo: bool,
    api_key: Option<&str>,
    base_url: &str,
    timeout_secs: u64,
    latency_ms: u64,
) -> Result<SourceMode, String> {
    if demo {
        return Ok(SourceMode::Demo { latency_ms });
    }

    match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Ok(SourceMode::Live {
            api_key: key.to_string(),
            base_url: base_url.to_string(),
            timeout_secs,
        }),
        None => Err(
            "No API key provided. Pass --api-key or set PAPPERS_API_KEY, or use --demo"
                .to_string(),
        ),
    }
}

/// Expand a leading `~` in an output path
pub fn expand_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "orgraph=debug,orgraph_core=debug,orgraph_scanner=debug"
    } else {
        "error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so reports on stdout stay clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

pub fn print_banner() {
    eprintln!(
        "{}",
        r#"
   ___  _ __ __ _ _ __ __ _ _ __ | |__
  / _ \| '__/ _` | '__/ _` | '_ \| '_ \
 | (_) | | | (_| | | | (_| | |_) | | | |
  \___/|_|  \__, |_|  \__,_| .__/|_| |_|
            |___/          |_|"#
            .bright_cyan()
            .bold()
    );
    eprintln!(
        "  {} {}\n",
        "ownership & directorship mapper".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

fn print_divider() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

/// Everything needed to run one crawl and produce its report
pub struct CrawlRequest {
    pub siren: String,
    pub max_cost_depth: u32,
    pub max_nodes: usize,
    pub source: SourceMode,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
    pub cancel: CancelToken,
}

fn print_crawl_summary(result: &CrawlResult, alerts: usize) {
    let outcome = match result.outcome {
        CrawlOutcome::Completed => "✓ Crawl complete".green().bold(),
        CrawlOutcome::BudgetReached => "✓ Crawl stopped at node limit".yellow().bold(),
        CrawlOutcome::Cancelled => "✗ Crawl cancelled, partial results".red().bold(),
    };
    eprintln!("\n{}", outcome);
    eprintln!(
        "  {} {} entities scanned, {} nodes, {} links",
        "→".blue(),
        result.stats.scanned,
        result.nodes.len(),
        result.edges.len()
    );
    if alerts > 0 {
        eprintln!(
            "  {} {} companies under collective procedure",
            "⚠".yellow().bold(),
            alerts.to_string().yellow().bold()
        );
    }
    if !result.stats.errors.is_empty() {
        eprintln!(
            "  {} {} fetch errors",
            "✗".red(),
            result.stats.errors.len()
        );
    }
    eprintln!();
}

/// Run the crawl and write the report, returning the report text
pub async fn run_crawl(request: CrawlRequest) -> anyhow::Result<String> {
    let CrawlRequest {
        siren,
        max_cost_depth,
        max_nodes,
        source,
        format,
        output,
        quiet,
        cancel,
    } = request;

    if !quiet {
        print_divider();
        eprintln!("{}", "  CRAWL".bright_white().bold());
        print_divider();
        eprintln!("{} Root: {}", "→".blue(), siren.bright_white());
        eprintln!("{} Source: {}", "→".blue(), source.name());
        eprintln!(
            "{} Max cost depth: {}, node limit: {}\n",
            "→".blue(),
            max_cost_depth,
            max_nodes
        );
    }

    let options = CrawlOptions {
        root_siren: siren.clone(),
        max_cost_depth,
        max_nodes,
        source,
        show_progress_bars: !quiet,
    };
    let result = execute_crawl(options, Some(cancel), None)
        .await
        .with_context(|| format!("Crawl of {} failed", siren))?;

    let data = gather_report_data(&result, &siren);
    if !quiet {
        print_crawl_summary(&result, data.alerts.len());
    }

    let content = generate_report(&data, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            save_report(&content, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", content),
    }

    Ok(content)
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let siren = args
        .get_one::<String>("siren")
        .ok_or_else(|| anyhow!("--siren is required"))?
        .clone();
    let source = resolve_source_mode(
        args.get_flag("demo"),
        args.get_one::<String>("api-key").map(String::as_str),
        args.get_one::<String>("base-url")
            .map(String::as_str)
            .unwrap_or(orgraph_scanner::pappers::DEFAULT_BASE_URL),
        args.get_one::<u64>("timeout").copied().unwrap_or(10),
        args.get_one::<u64>("latency").copied().unwrap_or(0),
    )
    .map_err(anyhow::Error::msg)?;

    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format: {}", format_name))?;

    let cancel = CancelToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping crawl");
            ctrl_c_token.cancel();
        }
    });

    let request = CrawlRequest {
        siren,
        max_cost_depth: args.get_one::<u32>("depth").copied().unwrap_or(2),
        max_nodes: args.get_one::<usize>("limit").copied().unwrap_or(50),
        source,
        format,
        output: args
            .get_one::<String>("output")
            .map(|p| expand_output_path(p)),
        quiet,
        cancel,
    };

    run_crawl(request).await.map(|_| ())
}
