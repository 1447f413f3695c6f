use serde::{Deserialize, Serialize};

/// One row of the CSV export
///
/// Field order is the column order; serde renames are the header names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Slug")]
    pub slug: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Founders")]
    pub founders: String,
    #[serde(rename = "About")]
    pub about: String,
    #[serde(rename = "FirstMark URL")]
    pub firstmark_url: String,
}

pub const EXPORT_HEADERS: [&str; 8] = [
    "Company",
    "Slug",
    "Website",
    "Partner",
    "Location",
    "Founders",
    "About",
    "FirstMark URL",
];
