pub mod browser;
pub mod error;
pub mod io;
pub mod models;
pub mod parsing;
pub mod stages;

pub use browser::{
    ChromeConfig, ChromeSession, ExtractorConfig, PageExtractor, PageSession, PortfolioExtractor,
    RenderedPage,
};
pub use error::FetchError;
pub use io::{read_company_refs, read_scraped_records, write_csv, write_json, write_text};
pub use models::{
    CompanyRef, ExportRow, NormalizedCompany, PageDetails, ScrapeOutcome, ScrapedRecord,
};
pub use stages::{
    execute_fetch, execute_normalize, execute_summarize, render_digest, render_table, FetchConfig,
    FetchResult, NormalizeResult, SummaryResult,
};
