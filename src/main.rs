//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `site_check` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Report output and exit status
//!
//! Exit status: 0 on success, 2 when the target is rejected, 3 when the
//! overall score is below `--min-score`, 1 for any other failure.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use site_check::config::DEFAULT_USER_AGENT;
use site_check::initialization::init_logger_with;
use site_check::{
    analyze_url, print_report, Category, Config, LogFormat, LogLevel, OutputFormat, TargetError,
    Thresholds,
};

const EXIT_INVALID_TARGET: i32 = 2;
const EXIT_BELOW_MIN_SCORE: i32 = 3;

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Audit every category
/// site_check example.com
///
/// # Only SEO and security, as JSON, failing below 70
/// site_check https://example.com --category seo --category security --output json --min-score 70
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "site_check",
    version,
    about = "Audits a web page for performance, SEO, security, accessibility and mobile readiness."
)]
struct Opt {
    /// URL or bare domain to audit
    url: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, env = "SITE_CHECK_LOG_LEVEL")]
    log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, env = "SITE_CHECK_LOG_FORMAT")]
    log_format: LogFormat,

    /// Report format: plain|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain, env = "SITE_CHECK_OUTPUT")]
    output: OutputFormat,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, env = "SITE_CHECK_TIMEOUT_SECONDS")]
    timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, env = "SITE_CHECK_USER_AGENT")]
    user_agent: String,

    /// Category to analyze; repeat for several (default: all)
    #[arg(long = "category", value_enum)]
    categories: Vec<Category>,

    /// Exit with status 3 when the overall score is below this value
    #[arg(long, env = "SITE_CHECK_MIN_SCORE")]
    min_score: Option<u8>,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        let categories = if opt.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            opt.categories
        };
        Config {
            log_level: opt.log_level,
            log_format: opt.log_format,
            output: opt.output,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            categories,
            thresholds: Thresholds::default(),
            min_score: opt.min_score,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory may hold SITE_CHECK_* defaults
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }

    let opt = Opt::parse();
    let url = opt.url.clone();
    let config = Config::from(opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match analyze_url(&url, &config).await {
        Ok(report) => {
            print_report(&report, config.output).context("Failed to write report")?;
            if let Some(min_score) = config.min_score {
                if report.composite.overall_score < min_score {
                    eprintln!(
                        "site_check: overall score {} is below the minimum of {}",
                        report.composite.overall_score, min_score
                    );
                    process::exit(EXIT_BELOW_MIN_SCORE);
                }
            }
            Ok(())
        }
        Err(e) if e.downcast_ref::<TargetError>().is_some() => {
            eprintln!("site_check error: {:#}", e);
            process::exit(EXIT_INVALID_TARGET);
        }
        Err(e) => {
            eprintln!("site_check error: {:#}", e);
            process::exit(1);
        }
    }
}
