use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::RenderedPage;
use crate::error::FetchError;
use crate::models::PageDetails;

// Selector strings are constants; parse only fails on a typo here.
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("extractor selector is valid CSS")
}

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static ABOUT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector(".description, .about"));
static FOUNDER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="founder"], [class*="team"]"#));
static TAG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="tag"], [class*="category"], [class*="label"]"#));
static STATUS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector(r#"[class*="status"]"#));
static MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("main, article, .content"));

/// Turns a rendered page into structured company details
///
/// The fetch stage only knows this trait; site-specific DOM rules live in
/// the implementation.
pub trait PageExtractor: Send + Sync {
    fn extract(&self, page: &RenderedPage) -> Result<PageDetails, FetchError>;
}

/// Configuration for the portfolio detail-page extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Host of the listing site; links back to it are never the company website
    pub listing_host: String,
    /// Domains treated as social profiles rather than company websites
    pub social_domains: Vec<String>,
    /// Paragraphs at or below this many characters are ignored for `about`
    pub min_paragraph_chars: usize,
    /// Founder/team entries must be shorter than this
    pub max_founder_chars: usize,
    /// Tags must be shorter than this
    pub max_tag_chars: usize,
    /// `details` keeps at most this many characters of the main content
    pub max_details_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            listing_host: "firstmark.com".to_string(),
            social_domains: vec![
                "linkedin.com".to_string(),
                "twitter.com".to_string(),
                "x.com".to_string(),
                "facebook.com".to_string(),
                "instagram.com".to_string(),
            ],
            min_paragraph_chars: 50,
            max_founder_chars: 100,
            max_tag_chars: 50,
            max_details_chars: 1000,
        }
    }
}

/// DOM rules for portfolio company detail pages
#[derive(Debug, Clone, Default)]
pub struct PortfolioExtractor {
    config: ExtractorConfig,
}

impl PortfolioExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn is_social(&self, url: &Url) -> bool {
        self.config
            .social_domains
            .iter()
            .any(|domain| host_matches(url, domain))
    }

    fn find_website(&self, links: &[Url]) -> Option<String> {
        links
            .iter()
            .find(|link| !host_matches(link, &self.config.listing_host) && !self.is_social(link))
            .map(|link| link.to_string())
    }

    fn find_about(&self, document: &Html) -> String {
        let paragraphs: Vec<String> = document.select(&PARAGRAPH_SELECTOR).map(element_text).collect();

        if paragraphs.is_empty() {
            return document
                .select(&ABOUT_SELECTOR)
                .next()
                .map(element_text)
                .unwrap_or_default();
        }

        paragraphs
            .into_iter()
            .filter(|text| text.chars().count() > self.config.min_paragraph_chars)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn find_founders(&self, document: &Html) -> Vec<String> {
        document
            .select(&FOUNDER_SELECTOR)
            .map(element_text)
            .filter(|text| !text.is_empty() && text.chars().count() < self.config.max_founder_chars)
            .collect()
    }

    fn find_tags(&self, document: &Html) -> IndexSet<String> {
        document
            .select(&TAG_SELECTOR)
            .map(element_text)
            .filter(|text| !text.is_empty() && text.chars().count() < self.config.max_tag_chars)
            .collect()
    }

    fn find_details(&self, document: &Html) -> String {
        document
            .select(&MAIN_SELECTOR)
            .next()
            .map(|main| {
                element_text(main)
                    .chars()
                    .take(self.config.max_details_chars)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl PageExtractor for PortfolioExtractor {
    fn extract(&self, page: &RenderedPage) -> Result<PageDetails, FetchError> {
        let base = Url::parse(&page.url)
            .map_err(|e| FetchError::Extraction(format!("invalid page URL {}: {}", page.url, e)))?;
        let document = Html::parse_document(&page.html);
        let links = outbound_links(&document, &base);

        let details = PageDetails {
            website: self.find_website(&links).unwrap_or_default(),
            details: self.find_details(&document),
            founders: self.find_founders(&document),
            about: self.find_about(&document),
            social_links: social_links(&links),
            tags: self.find_tags(&document),
            status: document
                .select(&STATUS_SELECTOR)
                .next()
                .map(element_text)
                .unwrap_or_default(),
        };

        debug!(
            "Extracted {}: website={:?}, {} founders, {} tags",
            page.url,
            details.website,
            details.founders.len(),
            details.tags.len()
        );

        Ok(details)
    }
}

/// Trimmed text content of an element and its descendants
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// All http(s) link targets in document order, resolved against the page URL
fn outbound_links(document: &Html, base: &Url) -> Vec<Url> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect()
}

/// First LinkedIn link and first Twitter/X link
fn social_links(links: &[Url]) -> IndexMap<String, String> {
    let mut social = IndexMap::new();

    if let Some(link) = links.iter().find(|l| host_matches(l, "linkedin.com")) {
        social.insert("linkedin".to_string(), link.to_string());
    }
    if let Some(link) = links
        .iter()
        .find(|l| host_matches(l, "twitter.com") || host_matches(l, "x.com"))
    {
        social.insert("twitter".to_string(), link.to_string());
    }

    social
}

/// True when the URL's host is `domain` or one of its subdomains
fn host_matches(url: &Url, domain: &str) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{}", domain))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <nav><a href="/portfolio">Portfolio</a><a href="https://www.firstmark.com/team">Team</a></nav>
  <main>
    <h1>Acme</h1>
    <span class="company-status">Active</span>
    <p>Short blurb.</p>
    <p>Acme builds reusable rockets that put small payloads into low earth orbit every week.</p>
    <p>Partner: Rick Heitzmann and a paragraph long enough to be kept by the extractor.</p>
    <div class="founder-card">Jane Doe</div>
    <div class="team-list">John Roe</div>
    <ul>
      <li class="tag">Space</li>
      <li class="category-pill">Hardware</li>
      <li class="tag">Space</li>
    </ul>
    <a href="https://www.linkedin.com/company/acme">LinkedIn</a>
    <a href="https://x.com/acme">X</a>
    <a href="https://twitter.com/acme_old">Twitter</a>
    <a href="https://acme.com/">Website</a>
    <a href="https://box.com/acme">Box</a>
  </main>
</body>
</html>"#;

    fn page(html: &str) -> RenderedPage {
        RenderedPage {
            url: "https://firstmark.com/company/acme".to_string(),
            html: html.to_string(),
        }
    }

    #[test]
    fn test_extract_detail_page() {
        let extractor = PortfolioExtractor::default();
        let details = extractor.extract(&page(PAGE)).unwrap();

        assert_eq!(details.website, "https://acme.com/");
        assert_eq!(details.status, "Active");
        assert_eq!(details.founders, vec!["Jane Doe".to_string(), "John Roe".to_string()]);
        assert_eq!(
            details.tags.iter().cloned().collect::<Vec<_>>(),
            vec!["Space".to_string(), "Hardware".to_string()]
        );
        assert_eq!(
            details.social_links.get("linkedin").map(String::as_str),
            Some("https://www.linkedin.com/company/acme")
        );
        assert_eq!(
            details.social_links.get("twitter").map(String::as_str),
            Some("https://x.com/acme")
        );
    }

    #[test]
    fn test_about_joins_long_paragraphs() {
        let details = PortfolioExtractor::default().extract(&page(PAGE)).unwrap();

        let paragraphs: Vec<&str> = details.about.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].starts_with("Acme builds reusable rockets"));
        assert!(!details.about.contains("Short blurb"));
    }

    #[test]
    fn test_about_falls_back_to_description() {
        let html = r#"<html><body><div class="description"> Rockets, but smaller. </div></body></html>"#;
        let details = PortfolioExtractor::default().extract(&page(html)).unwrap();
        assert_eq!(details.about, "Rockets, but smaller.");
    }

    #[test]
    fn test_details_truncated() {
        let long = "x".repeat(1500);
        let html = format!("<html><body><article>{}</article></body></html>", long);
        let details = PortfolioExtractor::default().extract(&page(&html)).unwrap();
        assert_eq!(details.details.chars().count(), 1000);
    }

    #[test]
    fn test_no_outbound_website() {
        let html = r#"<html><body><a href="/about">About</a><a href="https://linkedin.com/in/jane">Jane</a></body></html>"#;
        let details = PortfolioExtractor::default().extract(&page(html)).unwrap();
        assert_eq!(details.website, "");
        assert!(details.social_links.contains_key("linkedin"));
        assert!(!details.social_links.contains_key("twitter"));
    }

    #[test]
    fn test_invalid_page_url() {
        let bad = RenderedPage {
            url: "not a url".to_string(),
            html: String::new(),
        };
        let err = PortfolioExtractor::default().extract(&bad).unwrap_err();
        assert!(matches!(err, FetchError::Extraction(_)));
    }

    #[test]
    fn test_host_matches() {
        let url = Url::parse("https://www.linkedin.com/company/acme").unwrap();
        assert!(host_matches(&url, "linkedin.com"));

        let url = Url::parse("https://box.com/x").unwrap();
        assert!(!host_matches(&url, "x.com"));
    }
}
