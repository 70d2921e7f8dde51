use crate::domain::{LocationSummary, NormalizedRecord};
use crate::spreadsheets::ReportError;
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> ReportError + '_ {
    move |e| ReportError::Xlsx(format!("Failed to write {what}: {e}"))
}

fn write_headers(worksheet: &mut Worksheet, row: u32, headers: &[&str]) -> Result<(), ReportError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(row, col as u16, *header, &bold)
            .map_err(|e| {
                ReportError::Xlsx(format!("Failed to write header '{}': {}", header, e))
            })?;
    }
    Ok(())
}

fn write_listings(worksheet: &mut Worksheet, records: &[NormalizedRecord]) -> Result<(), ReportError> {
    worksheet.set_name("Listings").map_err(xlsx_err("sheet name"))?;
    write_headers(worksheet, 0, &["Price", "Area", "Location", "Name"])?;

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_number(r, 0, record.price as f64)
            .map_err(xlsx_err("price"))?;
        worksheet
            .write_number(r, 1, record.area)
            .map_err(xlsx_err("area"))?;
        worksheet
            .write_string(r, 2, &record.location)
            .map_err(xlsx_err("location"))?;
        worksheet
            .write_string(r, 3, &record.name)
            .map_err(xlsx_err("name"))?;
    }
    Ok(())
}

fn write_summary(
    worksheet: &mut Worksheet,
    summaries: &[LocationSummary],
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    worksheet.set_name("By location").map_err(xlsx_err("sheet name"))?;
    worksheet
        .write_string(0, 0, format!("Generated at {}", generated_at.to_rfc3339()))
        .map_err(xlsx_err("timestamp"))?;

    write_headers(
        worksheet,
        2,
        &[
            "Location",
            "Listings",
            "Mean price",
            "Min price",
            "Max price",
            "Mean area",
            "Mean price / m²",
        ],
    )?;

    for (i, summary) in summaries.iter().enumerate() {
        let r = (i + 3) as u32;

        worksheet
            .write_string(r, 0, &summary.location)
            .map_err(xlsx_err("location"))?;
        worksheet
            .write_number(r, 1, summary.listings as f64)
            .map_err(xlsx_err("listing count"))?;
        worksheet
            .write_number(r, 2, summary.mean_price)
            .map_err(xlsx_err("mean price"))?;
        worksheet
            .write_number(r, 3, summary.min_price as f64)
            .map_err(xlsx_err("min price"))?;
        worksheet
            .write_number(r, 4, summary.max_price as f64)
            .map_err(xlsx_err("max price"))?;
        worksheet
            .write_number(r, 5, summary.mean_area)
            .map_err(xlsx_err("mean area"))?;

        // Left blank when no listing had a usable area.
        if let Some(per_sqm) = summary.mean_price_per_sqm {
            worksheet
                .write_number(r, 6, per_sqm)
                .map_err(xlsx_err("price per m²"))?;
        }
    }
    Ok(())
}

/// Builds the analysis workbook: the normalized table plus the per-location
/// summary.
pub fn workbook_bytes(
    records: &[NormalizedRecord],
    summaries: &[LocationSummary],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    write_listings(workbook.add_worksheet(), records)?;
    write_summary(workbook.add_worksheet(), summaries, generated_at)?;

    workbook
        .save_to_buffer()
        .map_err(|e| ReportError::Xlsx(format!("Failed to save workbook: {}", e)))
}

pub fn export_workbook(
    path: &Path,
    records: &[NormalizedRecord],
    summaries: &[LocationSummary],
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    let buffer = workbook_bytes(records, summaries, generated_at)?;
    std::fs::write(path, buffer).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        listings = records.len(),
        locations = summaries.len(),
        "📊 Workbook exported"
    );
    Ok(())
}
