use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A company entry from the raw portfolio listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    /// URL-safe identifier, unique per company
    pub slug: String,
    /// Raw display text from the listing card (may carry tagline, ticker, exit)
    pub name: String,
    /// Link to the company's detail page on the listing site
    pub href: String,
}

/// A listing entry after name parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCompany {
    pub name: String,
    pub tagline: String,
    pub ticker: String,
    pub exchange: String,
    pub acquisition: bool,
    pub acquirer: String,
    pub slug: String,
    pub website: String,
}

impl NormalizedCompany {
    pub fn status_label(&self) -> &'static str {
        if self.acquisition { "Acquired" } else { "Active" }
    }

    pub fn has_ticker(&self) -> bool {
        !self.ticker.is_empty()
    }
}

/// Keep the first company for each slug, preserving order
pub fn dedup_by_slug(companies: &[CompanyRef]) -> Vec<CompanyRef> {
    let mut seen = HashSet::new();
    companies
        .iter()
        .filter(|c| seen.insert(c.slug.as_str()))
        .cloned()
        .collect()
}
