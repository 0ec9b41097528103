use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_concurrency, parse_duration_arg, parse_header, parse_positive_u64};
use super::types::{HttpMethod, PositiveU64};
use super::DEFAULT_CONCURRENCY;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load generator with per-request dynamic URLs and bodies ({{$uuid}}, {{$sequence(1,6)}}, ...) and nearest-rank latency percentiles."
)]
pub struct TesterArgs {
    /// Target URL; may contain {{$placeholder}} tokens rendered per request
    #[arg(long, short = 'u', help_heading = "Common Options")]
    pub url: Option<String>,

    /// Total number of requests to send
    #[arg(
        long = "requests",
        short = 'n',
        default_value = "100",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub requests: PositiveU64,

    /// Number of concurrent workers (1-100)
    #[arg(
        long,
        short = 'c',
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = parse_concurrency,
        help_heading = "Common Options"
    )]
    pub concurrency: usize,

    /// HTTP method to use
    #[arg(
        long,
        short = 'X',
        default_value = "get",
        ignore_case = true,
        help_heading = "Common Options"
    )]
    pub method: HttpMethod,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg,
        help_heading = "Common Options"
    )]
    pub timeout: Duration,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header, help_heading = "Common Options")]
    pub headers: Vec<(String, String)>,

    /// Request body for POST/PUT; may contain {{$placeholder}} tokens
    #[arg(long = "body", short = 'd', default_value = "")]
    pub body: String,

    /// Path to a TOML or JSON config file (defaults to volley.toml, then volley.json)
    #[arg(long)]
    pub config: Option<String>,

    /// Disable the live progress line
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by VOLLEY_LOG/RUST_LOG)
    #[arg(long, short = 'v', help_heading = "Common Options")]
    pub verbose: bool,
}
