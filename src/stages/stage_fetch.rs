use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::browser::{PageExtractor, PageSession};
use crate::error::FetchError;
use crate::io::write_json;
use crate::models::{dedup_by_slug, CompanyRef, PageDetails, ScrapedRecord};

/// Configuration for the fetch stage
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Companies per checkpoint
    pub batch_size: usize,
    /// Upper bound on a single page navigation
    pub navigation_timeout: Duration,
    /// Wait after navigation so client-side content can render
    pub settle_delay: Duration,
    /// Pause between consecutive page visits
    pub request_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            request_delay: Duration::from_secs(1),
        }
    }
}

/// Result of the fetch stage
#[derive(Debug)]
pub struct FetchResult {
    /// One record per unique slug, in input order
    pub records: Vec<ScrapedRecord>,
    pub succeeded: usize,
    pub failed: usize,
    /// Number of batches processed
    pub batches: usize,
}

/// Execute the fetch stage
///
/// Visits every unique company page one at a time:
/// 1. Navigate, bounded by the navigation timeout
/// 2. Wait for the settle delay
/// 3. Snapshot the DOM and run the extractor
///
/// A failing company becomes a record stub and the run continues. After each
/// batch the accumulated records replace the checkpoint file. An empty
/// listing still leaves an empty checkpoint behind.
pub async fn execute_fetch<S, E>(
    session: &S,
    extractor: &E,
    companies: &[CompanyRef],
    checkpoint_path: &Path,
    config: &FetchConfig,
) -> Result<FetchResult>
where
    S: PageSession + ?Sized,
    E: PageExtractor + ?Sized,
{
    let companies = dedup_by_slug(companies);
    let batch_size = config.batch_size.max(1);
    let total_batches = companies.len().div_ceil(batch_size);

    info!("Found {} unique companies to fetch", companies.len());

    let mut records = Vec::with_capacity(companies.len());
    let mut batches = 0;

    for (batch_index, batch) in companies.chunks(batch_size).enumerate() {
        info!("Processing batch {}/{}", batch_index + 1, total_batches);

        for company in batch {
            info!("Fetching {} ({})", company.name, company.href);

            let record = match fetch_company(session, extractor, company, config).await {
                Ok(details) => {
                    if details.website.is_empty() {
                        info!("  {}: no website found", company.slug);
                    } else {
                        info!("  {}: {}", company.slug, details.website);
                    }
                    ScrapedRecord::extracted(company, details)
                }
                Err(e) => {
                    warn!("  {} failed: {}", company.slug, e);
                    ScrapedRecord::failed(company, e.to_string())
                }
            };
            records.push(record);

            tokio::time::sleep(config.request_delay).await;
        }

        write_json(checkpoint_path, &records)?;
        batches += 1;
        info!(
            "Progress saved: {}/{} companies to {:?}",
            records.len(),
            companies.len(),
            checkpoint_path
        );
    }

    if batches == 0 {
        write_json(checkpoint_path, &records)?;
        info!("Nothing to fetch, wrote empty checkpoint to {:?}", checkpoint_path);
    }

    let failed = records.iter().filter(|r| r.is_failed()).count();

    Ok(FetchResult {
        succeeded: records.len() - failed,
        failed,
        batches,
        records,
    })
}

/// Load and extract a single company page
async fn fetch_company<S, E>(
    session: &S,
    extractor: &E,
    company: &CompanyRef,
    config: &FetchConfig,
) -> Result<PageDetails, FetchError>
where
    S: PageSession + ?Sized,
    E: PageExtractor + ?Sized,
{
    session
        .navigate(&company.href, config.navigation_timeout)
        .await?;

    tokio::time::sleep(config.settle_delay).await;

    let page = session.snapshot().await?;
    extractor.extract(&page)
}
