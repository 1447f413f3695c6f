use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use folio::{
    execute_fetch, execute_normalize, execute_summarize, read_company_refs, read_scraped_records,
    render_digest, render_table, write_csv, write_text, ChromeConfig, ChromeSession, FetchConfig,
    PortfolioExtractor,
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Venture portfolio scrape, normalize and export pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Visit every company page in a running browser and save the details
    Fetch {
        /// Raw portfolio listing (JSON array of {slug, name, href})
        #[arg(short, long, default_value = "research/portfolio_raw.json")]
        input: PathBuf,

        /// Detailed output, rewritten after every batch
        #[arg(short, long, default_value = "research/portfolio_detailed.json")]
        output: PathBuf,

        /// DevTools endpoint of a browser started with --remote-debugging-port
        #[arg(long, default_value = "http://localhost:9222")]
        endpoint: String,

        /// Companies per checkpoint
        #[arg(long, default_value = "5")]
        batch_size: usize,

        /// Wait after navigation before extracting, in milliseconds
        #[arg(long, default_value = "2000")]
        settle_ms: u64,

        /// Pause between page visits, in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Navigation timeout, in milliseconds
        #[arg(long, default_value = "30000")]
        timeout_ms: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse listing names into tickers, exits and taglines and write a table
    Normalize {
        /// Raw portfolio listing (JSON array of {slug, name, href})
        #[arg(short, long, default_value = "research/portfolio_raw.json")]
        input: PathBuf,

        /// Markdown table output
        #[arg(short, long, default_value = "research/portfolio_table.md")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export fetched details as CSV and a Markdown digest
    Summarize {
        /// Detailed records written by `fetch`
        #[arg(short, long, default_value = "research/portfolio_detailed.json")]
        input: PathBuf,

        /// CSV output
        #[arg(long, default_value = "research/portfolio_export.csv")]
        csv: PathBuf,

        /// Markdown digest output
        #[arg(long, default_value = "research/portfolio_summary.md")]
        markdown: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            input,
            output,
            endpoint,
            batch_size,
            settle_ms,
            delay_ms,
            timeout_ms,
            verbose,
        } => {
            setup_logging(verbose);
            let config = FetchConfig {
                batch_size,
                navigation_timeout: Duration::from_millis(timeout_ms),
                settle_delay: Duration::from_millis(settle_ms),
                request_delay: Duration::from_millis(delay_ms),
            };
            fetch(input, output, endpoint, config).await
        }
        Commands::Normalize {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            normalize(input, output)
        }
        Commands::Summarize {
            input,
            csv,
            markdown,
            verbose,
        } => {
            setup_logging(verbose);
            summarize(input, csv, markdown)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn fetch(
    input: PathBuf,
    output: PathBuf,
    endpoint: String,
    config: FetchConfig,
) -> Result<()> {
    info!("Loading listing from {:?}", input);
    let companies = read_company_refs(&input).context("Failed to load company listing")?;

    let chrome_config = ChromeConfig {
        endpoint,
        navigation_timeout: config.navigation_timeout,
        ..Default::default()
    };
    let session = ChromeSession::attach(&chrome_config)
        .await
        .context("Failed to attach to browser")?;
    let extractor = PortfolioExtractor::default();

    let result = execute_fetch(&session, &extractor, &companies, &output, &config).await?;

    info!("Fetch complete, results saved to {:?}", output);
    info!(
        "Total: {}, successful: {}, failed: {}",
        result.records.len(),
        result.succeeded,
        result.failed
    );

    Ok(())
}

fn normalize(input: PathBuf, output: PathBuf) -> Result<()> {
    info!("Loading listing from {:?}", input);
    let listing = read_company_refs(&input).context("Failed to load company listing")?;

    let result = execute_normalize(&listing);
    let table = render_table(&result, chrono::Local::now().date_naive());
    write_text(&output, &table)?;

    info!(
        "Wrote table with {} companies ({} active, {} acquired, {} public) to {:?}",
        result.stats.total,
        result.stats.active,
        result.stats.acquired,
        result.stats.with_ticker,
        output
    );

    Ok(())
}

fn summarize(input: PathBuf, csv: PathBuf, markdown: PathBuf) -> Result<()> {
    info!("Loading detailed records from {:?}", input);
    let records = read_scraped_records(&input).context("Failed to load detailed records")?;

    let result = execute_summarize(&records);
    write_csv(&csv, &result.rows)?;
    info!("CSV export written to {:?}", csv);

    let digest = render_digest(&result, chrono::Local::now().date_naive());
    write_text(&markdown, &digest)?;
    info!("Summary written to {:?}", markdown);

    info!("Processed {} companies", result.rows.len());
    Ok(())
}
