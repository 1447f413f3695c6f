use std::collections::HashSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::models::{ExportRow, ScrapedRecord};
use crate::parsing::{clean_about, extract_founders, extract_location, extract_partner};

/// Number of companies shown in full in the digest
pub const SAMPLE_SIZE: usize = 5;

/// Result of the summarize stage
#[derive(Debug)]
pub struct SummaryResult {
    /// One row per unique slug, in input order
    pub rows: Vec<ExportRow>,
    /// Companies per partner, most first; ties keep first-seen order
    pub partner_counts: Vec<(String, usize)>,
    /// Records that were fetch stubs
    pub failed: usize,
}

/// Build the CSV row for one record
///
/// Failed records keep their identity fields and leave the rest empty.
pub fn export_row(record: &ScrapedRecord) -> ExportRow {
    let about = record.about();
    let founders = record
        .details()
        .and_then(|d| extract_founders(&d.details))
        .unwrap_or_default();

    ExportRow {
        company: record.name.clone(),
        slug: record.slug.clone(),
        website: record.website().to_string(),
        partner: extract_partner(about).unwrap_or_default(),
        location: extract_location(about).unwrap_or_default(),
        founders,
        about: clean_about(about),
        firstmark_url: record.firstmark_url.clone(),
    }
}

/// Execute the summarize stage
pub fn execute_summarize(records: &[ScrapedRecord]) -> SummaryResult {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    let mut failed = 0;

    for record in records {
        if !seen.insert(record.slug.as_str()) {
            warn!("Skipping duplicate record for {}", record.slug);
            continue;
        }
        if record.is_failed() {
            failed += 1;
        }
        rows.push(export_row(record));
    }

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for row in rows.iter().filter(|r| !r.partner.is_empty()) {
        *counts.entry(row.partner.clone()).or_default() += 1;
    }
    let mut partner_counts: Vec<(String, usize)> = counts.into_iter().collect();
    partner_counts.sort_by(|a, b| b.1.cmp(&a.1));

    info!(
        "Summarized {} companies ({} failed fetches, {} partners)",
        rows.len(),
        failed,
        partner_counts.len()
    );

    SummaryResult {
        rows,
        partner_counts,
        failed,
    }
}

/// Render the Markdown digest
pub fn render_digest(result: &SummaryResult, generated_on: NaiveDate) -> String {
    let mut md = String::from("# FirstMark Portfolio Companies - Complete Export\n\n");
    md.push_str(&format!("**Total Companies:** {}\n", result.rows.len()));
    if result.failed > 0 {
        md.push_str(&format!("**Failed Fetches:** {}\n", result.failed));
    }
    md.push_str(&format!("**Generated:** {}\n\n", generated_on.format("%Y-%m-%d")));

    md.push_str("## Summary Statistics\n\n");
    md.push_str("### Companies by Partner\n\n");
    for (partner, count) in &result.partner_counts {
        md.push_str(&format!("- **{}**: {} companies\n", partner, count));
    }

    md.push_str("\n## Sample Company Data\n\n");
    for row in result.rows.iter().take(SAMPLE_SIZE) {
        md.push_str(&format!("### {}\n\n", row.company));
        md.push_str(&format!("- **Website:** {}\n", or_dash(&row.website)));
        md.push_str(&format!("- **FirstMark URL:** {}\n", row.firstmark_url));
        if !row.partner.is_empty() {
            md.push_str(&format!("- **Partner:** {}\n", row.partner));
        }
        if !row.location.is_empty() {
            md.push_str(&format!("- **Location:** {}\n", row.location));
        }
        if !row.about.is_empty() {
            md.push_str(&format!("\n{}\n", row.about));
        }
        md.push_str("\n---\n\n");
    }

    md.push_str("\n## All Companies List\n\n");
    for (index, row) in result.rows.iter().enumerate() {
        md.push_str(&format!(
            "{}. **{}** - {}\n",
            index + 1,
            row.company,
            or_dash(&row.website)
        ));
    }

    md
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{export_csv_string, parse_scraped_records};

    const DETAILED: &str = r#"[
        {
            "slug": "acme",
            "name": "Acme",
            "firstmarkUrl": "https://firstmark.com/company/acme",
            "website": "https://acme.com/",
            "details": "Acme\n\nFounders\n\nJane Doe, John Roe\n\nLocation",
            "founders": [],
            "about": "Partner: Rick Heitzmann\nLocation: New York, NY\nExit: IPO\nAcme calls itself \"the rocket company\".",
            "socialLinks": {},
            "tags": [],
            "status": "",
            "scrapedAt": "2024-05-01T12:00:00Z"
        },
        {
            "slug": "beta",
            "name": "Beta",
            "firstmarkUrl": "https://firstmark.com/company/beta",
            "website": "https://beta.io/",
            "details": "",
            "founders": [],
            "about": "Partner: Amish Jani\nBeta does data.",
            "socialLinks": {},
            "tags": [],
            "status": "",
            "scrapedAt": "2024-05-01T12:00:02Z"
        },
        {
            "slug": "gamma",
            "name": "Gamma",
            "firstmarkUrl": "https://firstmark.com/company/gamma",
            "website": "https://gamma.dev/",
            "details": "",
            "founders": [],
            "about": "Partner: Rick Heitzmann\nGamma ships.",
            "socialLinks": {},
            "tags": [],
            "status": "",
            "scrapedAt": "2024-05-01T12:00:04Z"
        },
        {
            "slug": "broken",
            "name": "Broken",
            "firstmarkUrl": "https://firstmark.com/company/broken",
            "error": "navigation timed out",
            "scrapedAt": "2024-05-01T12:00:06Z"
        },
        {
            "slug": "acme",
            "name": "Acme again",
            "firstmarkUrl": "https://firstmark.com/company/acme",
            "error": "duplicate",
            "scrapedAt": "2024-05-01T12:00:08Z"
        }
    ]"#;

    fn summarize() -> SummaryResult {
        execute_summarize(&parse_scraped_records(DETAILED).unwrap())
    }

    #[test]
    fn test_export_row_fields() {
        let result = summarize();
        let acme = &result.rows[0];

        assert_eq!(acme.company, "Acme");
        assert_eq!(acme.partner, "Rick Heitzmann");
        assert_eq!(acme.location, "New York, NY");
        assert_eq!(acme.founders, "Jane Doe, John Roe");
        assert_eq!(acme.about, "Acme calls itself \"the rocket company\".");
        assert!(!acme.about.contains("Partner:"));
        assert!(!acme.about.contains("Exit:"));
    }

    #[test]
    fn test_one_row_per_slug() {
        let result = summarize();
        let slugs: Vec<&str> = result.rows.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["acme", "beta", "gamma", "broken"]);
        assert_eq!(result.failed, 1);
    }

    #[test]
    fn test_failed_record_row_is_identity_only() {
        let result = summarize();
        let broken = &result.rows[3];

        assert_eq!(broken.company, "Broken");
        assert_eq!(broken.firstmark_url, "https://firstmark.com/company/broken");
        assert_eq!(broken.website, "");
        assert_eq!(broken.about, "");
        assert_eq!(broken.partner, "");
    }

    #[test]
    fn test_partner_counts_descending() {
        let result = summarize();
        assert_eq!(
            result.partner_counts,
            vec![
                ("Rick Heitzmann".to_string(), 2),
                ("Amish Jani".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_csv_recovers_quoted_about() {
        let result = summarize();
        let csv = export_csv_string(&result.rows).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let parsed: Vec<ExportRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(parsed[0].about, "Acme calls itself \"the rocket company\".");
        assert_eq!(parsed, result.rows);
    }

    #[test]
    fn test_render_digest() {
        let result = summarize();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let md = render_digest(&result, date);

        assert!(md.starts_with("# FirstMark Portfolio Companies - Complete Export\n\n**Total Companies:** 4\n"));
        assert!(md.contains("**Failed Fetches:** 1\n"));
        assert!(md.contains("**Generated:** 2024-05-01\n"));
        assert!(md.contains("- **Rick Heitzmann**: 2 companies\n- **Amish Jani**: 1 companies\n"));
        assert!(md.contains("### Acme\n\n- **Website:** https://acme.com/\n"));
        assert!(md.contains("- **Location:** New York, NY\n\nAcme calls itself \"the rocket company\".\n"));
        assert!(md.contains("4. **Broken** - -\n"));
    }

    #[test]
    fn test_digest_samples_first_five() {
        let records: Vec<ScrapedRecord> = (0..7)
            .map(|i| {
                let company = crate::models::CompanyRef {
                    slug: format!("c{}", i),
                    name: format!("Company {}", i),
                    href: format!("https://firstmark.com/company/c{}", i),
                };
                ScrapedRecord::extracted(&company, Default::default())
            })
            .collect();
        let result = execute_summarize(&records);

        let md = render_digest(&result, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        assert!(md.contains("### Company 4\n"));
        assert!(!md.contains("### Company 5\n"));
        assert!(md.contains("7. **Company 6** - -\n"));
    }
}
