use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{CompanyRef, ScrapedRecord};

/// Read the raw portfolio listing (JSON array of company refs)
pub fn read_company_refs(path: &Path) -> Result<Vec<CompanyRef>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_company_refs(&content).with_context(|| format!("Invalid listing file: {:?}", path))
}

pub fn parse_company_refs(json: &str) -> Result<Vec<CompanyRef>> {
    serde_json::from_str(json).context("Failed to parse company listing JSON")
}

/// Read the fetcher's detailed output (JSON array of scraped records)
pub fn read_scraped_records(path: &Path) -> Result<Vec<ScrapedRecord>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_scraped_records(&content).with_context(|| format!("Invalid detail file: {:?}", path))
}

pub fn parse_scraped_records(json: &str) -> Result<Vec<ScrapedRecord>> {
    serde_json::from_str(json).context("Failed to parse scraped records JSON")
}
