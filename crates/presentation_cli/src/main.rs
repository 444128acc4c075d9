//! SupplySync CLI
//!
//! Command-line interface for local analysis and for talking to a running
//! server.

#![allow(clippy::print_stdout)]

mod local;

use std::path::PathBuf;

use application::{Strategy, ports::ReportFormat};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// SupplySync CLI
#[derive(Parser)]
#[command(name = "supplysync-cli")]
#[command(author, version, about = "Supplier email analysis CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an email locally, without a server
    ///
    /// Reads the email from --file, or from stdin when no file is given,
    /// and prints the analysis as JSON.
    ///
    /// Example: supplysync-cli analyze --file mail.txt --strategy rule-based
    Analyze {
        /// File holding the raw email text
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Strategy; the configured default when omitted
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Configuration file (TOML)
        #[arg(short, long, env = "SUPPLYSYNC_CONFIG")]
        config: Option<PathBuf>,

        /// Store the result in the configured history database
        #[arg(long)]
        save: bool,
    },

    /// Render a report from analysis JSON
    ///
    /// Accepts the output of `analyze`.
    ///
    /// Example: supplysync-cli report analysis.json --format html -o reminder.html
    Report {
        /// File holding the analysis JSON
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (TOML)
        #[arg(short, long, env = "SUPPLYSYNC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// List recent analyses stored by a server
    History {
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Show server readiness details
    Status {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Check server health (used by Docker healthcheck)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Strategy names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Keyword rules only
    RuleBased,
    /// Generative backend, with rule fallback when configured
    Generative,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RuleBased => Self::RuleBased,
            StrategyArg::Generative => Self::Generative,
        }
    }
}

/// Report formats accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Html => Self::Html,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            strategy,
            config,
            save,
        } => {
            let email = local::read_email(file.as_deref()).await?;
            let config = local::load_config(config.as_deref())?;
            let response =
                local::analyze(config, email, strategy.map(Strategy::from), save).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        },

        Commands::Report {
            input,
            format,
            output,
            config,
        } => {
            let config = local::load_config(config.as_deref())?;
            let report = local::render_report(config, &input, format.into()).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, report.body).await?;
                    println!("Report written to {}", path.display());
                },
                None => println!("{}", report.body),
            }
        },

        Commands::History { limit, url } => {
            let resp = reqwest::Client::new()
                .get(endpoint_url(&url, "/api/history"))
                .query(&[("limit", limit)])
                .send()
                .await?
                .error_for_status()?
                .json::<serde_json::Value>()
                .await?;

            println!("{}", serde_json::to_string_pretty(&resp)?);
        },

        Commands::Status { url } => {
            let resp = reqwest::Client::new()
                .get(endpoint_url(&url, "/ready"))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?;

            println!("System Status:");
            println!("{}", serde_json::to_string_pretty(&resp)?);
        },

        Commands::Health { url } => {
            match reqwest::Client::new()
                .get(endpoint_url(&url, "/ready"))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    println!("Healthy");
                    std::process::exit(0);
                },
                Ok(resp) => {
                    println!("Unhealthy: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },
    }

    Ok(())
}
