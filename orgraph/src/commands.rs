use crate::CLAP_STYLING;
use clap::{arg, command};
use orgraph::parse_siren_arg;
use orgraph_scanner::pappers::DEFAULT_BASE_URL;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("orgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("orgraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(arg!(-v --"verbose" "Log crawl decisions to stderr").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl the ownership and directorship network around a company. \
                Reports alerted companies and the directors tied to them.",
                )
                .arg(
                    arg!(-s --"siren" <SIREN>)
                        .required(true)
                        .help("SIREN of the root company (9 digits, spaces allowed)")
                        .value_parser(parse_siren_arg),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum number of director or shareholder hops from the root")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("2"),
                )
                .arg(
                    arg!(-l --"limit" <LIMIT>)
                        .required(false)
                        .help("Maximum number of companies fetched from the registry")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(--"api-key" <KEY>)
                        .required(false)
                        .help("Pappers API key")
                        .env("PAPPERS_API_KEY")
                        .hide_env_values(true),
                )
                .arg(
                    arg!(--"demo")
                        .required(false)
                        .help("Use the built-in offline registry instead of the live API")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"latency" <MS>)
                        .required(false)
                        .help("Simulated delay per call in demo mode, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("0")
                        .requires("demo"),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Registry API base URL")
                        .default_value(DEFAULT_BASE_URL),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout for the live API")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown", "md"])
                        .default_value("text"),
                ),
        )
}
