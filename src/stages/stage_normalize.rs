use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::info;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{dedup_by_slug, CompanyRef, NormalizedCompany};
use crate::parsing::parse_listing_name;

/// Aggregate counts for the portfolio table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub total: usize,
    pub active: usize,
    pub acquired: usize,
    pub with_ticker: usize,
}

/// Result of the normalize stage
#[derive(Debug)]
pub struct NormalizeResult {
    /// One entry per unique slug, sorted by name
    pub companies: Vec<NormalizedCompany>,
    pub stats: NormalizeStats,
}

/// Execute the normalize stage
///
/// Deduplicates the raw listing by slug (first wins), parses each raw name
/// and sorts the result by display name.
pub fn execute_normalize(listing: &[CompanyRef]) -> NormalizeResult {
    let unique = dedup_by_slug(listing);
    if unique.len() < listing.len() {
        info!(
            "Dropped {} duplicate listing entries",
            listing.len() - unique.len()
        );
    }

    let mut companies: Vec<NormalizedCompany> = unique
        .into_iter()
        .map(|company| {
            let parsed = parse_listing_name(&company.name, &company.slug);
            NormalizedCompany {
                name: parsed.name,
                tagline: parsed.tagline,
                ticker: parsed.ticker,
                exchange: parsed.exchange,
                acquisition: parsed.acquisition,
                acquirer: parsed.acquirer,
                slug: company.slug,
                website: company.href,
            }
        })
        .collect();

    companies.sort_by(|a, b| compare_names(&a.name, &b.name));

    let acquired = companies.iter().filter(|c| c.acquisition).count();
    let stats = NormalizeStats {
        total: companies.len(),
        active: companies.len() - acquired,
        acquired,
        with_ticker: companies.iter().filter(|c| c.has_ticker()).count(),
    };

    NormalizeResult { companies, stats }
}

/// Dictionary-style ordering
///
/// Letters compare by base form first (`É` sorts with `E`, case ignored),
/// then accented after unaccented, then lowercase before uppercase.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Lowercased base letters with combining marks removed
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Render the portfolio as a Markdown table with summary counts
pub fn render_table(result: &NormalizeResult, generated_on: NaiveDate) -> String {
    let mut markdown = String::from("# FirstMark Portfolio Companies\n\n");
    markdown.push_str("| # | Company | Tagline | Ticker | Exchange | Status | Acquirer | Website |\n");
    markdown.push_str("|---|---------|---------|--------|----------|--------|----------|---------|\n");

    for (index, company) in result.companies.iter().enumerate() {
        markdown.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            index + 1,
            cell(&company.name),
            cell(&company.tagline),
            cell(&company.ticker),
            cell(&company.exchange),
            company.status_label(),
            cell(&company.acquirer),
            cell(&company.website),
        ));
    }

    let stats = &result.stats;
    markdown.push_str(&format!(
        "\n\n**Total Companies:** {}\n**Active:** {}\n**Acquired:** {}\n**Public (with ticker):** {}\n",
        stats.total, stats.active, stats.acquired, stats.with_ticker
    ));
    markdown.push_str(&format!(
        "\n*Generated on: {}*\n",
        generated_on.format("%Y-%m-%d")
    ));

    markdown
}

/// Table cell text: `-` when empty, pipes escaped
fn cell(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.replace('|', "\\|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(slug: &str, name: &str) -> CompanyRef {
        CompanyRef {
            slug: slug.to_string(),
            name: name.to_string(),
            href: format!("https://firstmark.com/company/{}", slug),
        }
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let result = execute_normalize(&[
            listing("zeta", "Zeta"),
            listing("alpha", "alpha"),
            listing("beta", "Beta"),
        ]);

        // "alpha" has no capitalized phrase, so it falls back to its slug
        let names: Vec<&str> = result.companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_compare_names() {
        let mut names = vec!["Zeta", "alpha", "Beta"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["alpha", "Beta", "Zeta"]);

        assert_eq!(compare_names("acme", "Acme"), Ordering::Less);
        assert_eq!(compare_names("Acme", "Acme"), Ordering::Equal);
    }

    #[test]
    fn test_accented_names_sort_with_base_letter() {
        let mut names = vec!["Zeta", "Émile", "Beta"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["Beta", "Émile", "Zeta"]);

        assert_eq!(compare_names("emile", "Émile"), Ordering::Less);
        assert_eq!(compare_names("Ångström", "Banana"), Ordering::Less);
        assert_eq!(collation_key("Crème Brûlée"), "creme brulee");
    }

    #[test]
    fn test_duplicate_slugs_first_wins() {
        let result = execute_normalize(&[
            listing("acme", "Rocket company Acme"),
            listing("acme", "Something Else Entirely"),
            listing("beta", "Beta"),
        ]);

        assert_eq!(result.companies.len(), 2);
        let acme = result.companies.iter().find(|c| c.slug == "acme").unwrap();
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.tagline, "Rocket company");
    }

    #[test]
    fn test_stats() {
        let result = execute_normalize(&[
            listing("datadog", "Cloud monitoring NASDAQ: DDOG Datadog"),
            listing("widgets", "Great Widgets Acquired by BigCo"),
            listing("acme", "Rocket company Acme"),
        ]);

        assert_eq!(
            result.stats,
            NormalizeStats {
                total: 3,
                active: 2,
                acquired: 1,
                with_ticker: 1,
            }
        );
    }

    #[test]
    fn test_render_table() {
        let result = execute_normalize(&[
            listing("datadog", "Cloud monitoring NASDAQ: DDOG Datadog"),
            listing("widgets", "Great Widgets Acquired by BigCo"),
        ]);
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let table = render_table(&result, date);

        assert!(table.starts_with("# FirstMark Portfolio Companies\n\n| # | Company |"));
        assert!(table.contains(
            "| 1 | Datadog | Cloud monitoring | DDOG | NASDAQ | Active | - | https://firstmark.com/company/datadog |"
        ));
        assert!(table.contains(
            "| 2 | Great Widgets | - | - | - | Acquired | BigCo | https://firstmark.com/company/widgets |"
        ));
        assert!(table.contains("**Total Companies:** 2\n"));
        assert!(table.contains("**Public (with ticker):** 1\n"));
        assert!(table.ends_with("*Generated on: 2024-05-01*\n"));
    }

    #[test]
    fn test_cell_escapes_pipes() {
        assert_eq!(cell("a | b"), "a \\| b");
        assert_eq!(cell(""), "-");
    }
}
