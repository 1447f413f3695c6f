use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::models::{ExportRow, EXPORT_HEADERS};

/// Replace `path` with `contents` via a temp file in the same directory
///
/// Readers see either the previous file or the complete new one, never a
/// partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file for {:?}", path))?;
    file.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync temp file for {:?}", path))?;
    file.persist(path)
        .with_context(|| format!("Failed to replace file: {:?}", path))?;
    Ok(())
}

/// Write pretty-printed JSON atomically
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).context("Failed to serialize JSON")?;
    write_atomic(path, &json)
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    write_atomic(path, text.as_bytes())
}

/// Render export rows as CSV with every field quoted
pub fn export_csv_string(rows: &[ExportRow]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row for {}", row.slug))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

pub fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let csv = export_csv_string(rows)?;
    write_text(path, &csv)
}
