//! docguard - documentation bundle validator
//!
//! Runs every check against a docs root and exits with the number of failed
//! results. With no arguments it validates the current directory using the
//! built-in package, account and URL lists.

use std::{
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use docguard_core::{
    formatters::{HumanFormatter, JsonFormatter, OutputFormat},
    probe::{HttpProbe, Probe},
    DocGuardConfig, DocValidator,
};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit code used when the run cannot start (bad config, missing docs root);
/// fail counts are capped below it
const STARTUP_FAILURE_EXIT: i32 = 255;

/// Validate a Markdown documentation bundle
#[derive(Parser, Debug)]
#[command(name = "docguard")]
#[command(
    version,
    about = "Validate a Markdown documentation bundle",
    long_about = "
Validate a Markdown documentation bundle.

Checks the entry document's frontmatter, probes the package registry, chain
endpoint and URLs the docs rely on, and scans every document for leaked keys,
personal references, stale domains, malformed API URLs and broken relative
links.

Exit code:
  0     no failed checks (warnings don't affect exit code)
  N     number of failed checks (capped at 254)
  255   the run could not start
"
)]
struct Cli {
    /// Docs root to validate
    #[arg(long, env = "DOCGUARD_DOCS", default_value = ".")]
    docs: PathBuf,

    /// Config file (default: first of .docguard.toml, docguard.toml,
    /// .config/docguard.toml under the docs root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputFormatArg,

    /// Skip package, account and URL checks
    #[arg(long)]
    offline: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "DOCGUARD_LOG", default_value = "warn")]
    log_level: String,
}

/// Available output formats
#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormatArg {
    /// Human-readable format with symbols (default)
    Human,
    /// JSON report for tooling
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "❌".bright_red(), e);
            STARTUP_FAILURE_EXIT
        },
    };
    process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let output_format: OutputFormat = cli.output.into();
    init_logging(&cli, output_format)?;

    let use_colors = should_use_colors(&cli, output_format);
    colored::control::set_override(use_colors);

    let config = DocGuardConfig::load(&cli.docs, cli.config.as_deref())
        .context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);

    let probe = build_probe(&config, cli.offline)?;
    let validator = DocValidator::for_root(&cli.docs, config, probe)
        .with_context(|| format!("Failed to prepare validation of {}", cli.docs.display()))?;

    match output_format {
        OutputFormat::Human => {
            let formatter = HumanFormatter::new(use_colors);
            print_header(&cli.docs, validator.docs().len(), validator.is_offline(), use_colors);
            let report = validator
                .run_with(|check, results| {
                    println!("{}", formatter.format_section(check, results));
                })
                .await;
            print!("{}", formatter.format_summary(&report.summary));
            Ok(report.exit_code())
        },
        OutputFormat::Json => {
            let report = validator.run().await;
            let json = JsonFormatter.format_report(&report).context("Failed to render report")?;
            println!("{}", json);
            Ok(report.exit_code())
        },
    }
}

/// Install the tracing subscriber; logs go to stderr so stdout stays clean
fn init_logging(cli: &Cli, output_format: OutputFormat) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if output_format == OutputFormat::Json {
        Level::ERROR
    } else {
        cli.log_level.parse::<Level>().unwrap_or(Level::WARN)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default tracing subscriber")
}

fn build_probe(config: &DocGuardConfig, offline: bool) -> Result<Option<Box<dyn Probe>>> {
    if offline {
        return Ok(None);
    }
    let probe = HttpProbe::from_config(config).context("Failed to build HTTP client")?;
    Ok(Some(Box::new(probe)))
}

/// Colors only for human output on a terminal, and never with --no-color
fn should_use_colors(cli: &Cli, output_format: OutputFormat) -> bool {
    !cli.no_color
        && output_format == OutputFormat::Human
        && std::env::var_os("NO_COLOR").is_none()
        && atty::is(atty::Stream::Stdout)
}

fn print_header(docs: &Path, count: usize, offline: bool, use_colors: bool) {
    let title = format!("docguard v{}", env!("CARGO_PKG_VERSION"));
    if use_colors {
        println!("{} {}", "📚".bright_blue(), title.bold());
    } else {
        println!("📚 {}", title);
    }
    println!("   {} documents under {}", count, docs.display());
    if offline {
        println!("   offline: package, account and URL checks skipped");
    }
    println!();
}
