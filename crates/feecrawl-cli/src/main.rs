//! feecrawl CLI - crawl municipal fee schedules into a table

mod input;
mod output;

use clap::Parser;
use feecrawl::Crawler;
use output::OutputFormat;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// feecrawl - extract hourly rates and billing models from municipal fee schedules
#[derive(Parser, Debug)]
#[command(name = "feecrawl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON or CSV file with the municipality -> URL mapping
    #[arg(long, default_value = "municipalities.csv")]
    input: PathBuf,

    /// File to write results to
    #[arg(long, default_value = "municipal_fees.csv")]
    output: PathBuf,

    /// Output format (defaults to the output file extension)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Municipalities processed in parallel
    #[arg(long, default_value_t = feecrawl::client::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Do not fetch PDFs linked from HTML pages
    #[arg(long)]
    no_follow_pdf: bool,

    /// Do not print the result table to stdout
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(message) = run(cli).await {
        error!("{message}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let entries = input::load_municipalities(&cli.input).map_err(|e| e.to_string())?;
    info!(path = %cli.input.display(), entries = entries.len(), "Loaded municipalities");

    let mut builder = Crawler::builder()
        .concurrency(cli.concurrency)
        .timeout(Duration::from_secs(cli.timeout))
        .follow_pdf_links(!cli.no_follow_pdf);
    if let Some(ua) = cli.user_agent {
        builder = builder.user_agent(ua);
    }
    let crawler = builder.build().map_err(|e| e.to_string())?;

    let table = crawler.run(&entries).await;

    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&cli.output));
    output::write_table(&table, &cli.output, format).map_err(|e| e.to_string())?;
    info!(path = %cli.output.display(), rows = table.len(), "Wrote results");

    if !cli.quiet {
        write_safe(&output::format_table(&table));
    }
    Ok(())
}

/// Write to stdout, exit silently on broken pipe
fn write_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = handle.write_all(s.as_bytes()) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["feecrawl"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("municipalities.csv"));
        assert_eq!(cli.output, PathBuf::from("municipal_fees.csv"));
        assert_eq!(cli.format, None);
        assert_eq!(cli.concurrency, 4);
        assert_eq!(cli.timeout, 10);
        assert!(!cli.no_follow_pdf);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "feecrawl",
            "--input",
            "kommuner.json",
            "--output",
            "ut.txt",
            "--format",
            "json",
            "--concurrency",
            "1",
            "--timeout",
            "3",
            "--no-follow-pdf",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("kommuner.json"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.concurrency, 1);
        assert_eq!(cli.timeout, 3);
        assert!(cli.no_follow_pdf);
        assert!(cli.quiet);
    }

    #[tokio::test]
    async fn test_run_missing_input() {
        let cli = Cli::try_parse_from(["feecrawl", "--input", "/nonexistent/kommuner.csv"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(err.contains("not found"));
    }
}
