use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::CompanyRef;

/// Fields pulled out of a company detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDetails {
    pub website: String,
    /// Main content text, truncated
    pub details: String,
    pub founders: Vec<String>,
    pub about: String,
    /// Platform name (`linkedin`, `twitter`) to profile URL
    pub social_links: IndexMap<String, String>,
    pub tags: IndexSet<String>,
    pub status: String,
}

/// Either the extracted page or the reason extraction failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeOutcome {
    Failed { error: String },
    Extracted(PageDetails),
}

/// One fetched company, as stored in the detailed checkpoint file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedRecord {
    pub slug: String,
    pub name: String,
    pub firstmark_url: String,
    #[serde(flatten)]
    pub outcome: ScrapeOutcome,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapedRecord {
    pub fn extracted(company: &CompanyRef, details: PageDetails) -> Self {
        Self {
            slug: company.slug.clone(),
            name: company.name.clone(),
            firstmark_url: company.href.clone(),
            outcome: ScrapeOutcome::Extracted(details),
            scraped_at: Utc::now(),
        }
    }

    /// Record stub for a company whose page could not be processed
    pub fn failed(company: &CompanyRef, error: impl Into<String>) -> Self {
        Self {
            slug: company.slug.clone(),
            name: company.name.clone(),
            firstmark_url: company.href.clone(),
            outcome: ScrapeOutcome::Failed {
                error: error.into(),
            },
            scraped_at: Utc::now(),
        }
    }

    pub fn details(&self) -> Option<&PageDetails> {
        match &self.outcome {
            ScrapeOutcome::Extracted(details) => Some(details),
            ScrapeOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ScrapeOutcome::Failed { error } => Some(error),
            ScrapeOutcome::Extracted(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error().is_some()
    }

    pub fn website(&self) -> &str {
        self.details().map(|d| d.website.as_str()).unwrap_or("")
    }

    pub fn about(&self) -> &str {
        self.details().map(|d| d.about.as_str()).unwrap_or("")
    }
}
