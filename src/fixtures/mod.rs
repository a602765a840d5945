pub mod csv_sample;
pub mod docx;
pub mod logo;
pub mod ooxml;
pub mod pdf;
pub mod xlsx;

use crate::{
    config::Config,
    util::{ensure_dir, sha256_hex, write_file},
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const LOGO_PNG: &str = "logo.png";
pub const SAMPLE_CSV: &str = "sample.csv";
pub const SAMPLE_XLSX: &str = "sample.xlsx";
pub const SAMPLE_DOCX: &str = "sample.docx";
pub const TEXT_PDF: &str = "text_metadata.pdf";
pub const IMAGE_TABLE_PDF: &str = "image_table.pdf";

/// Every file the generator writes, in generation order.
pub const ALL: [&str; 6] = [
    LOGO_PNG,
    SAMPLE_CSV,
    SAMPLE_XLSX,
    SAMPLE_DOCX,
    TEXT_PDF,
    IMAGE_TABLE_PDF,
];

#[derive(Debug, Clone, Serialize)]
pub struct FixtureRecord {
    pub name: String,
    pub bytes: u64,
    pub sha256: String,
}

/// Writes the full fixture set into `out_dir`. The logo is rendered first and
/// handed read-only to the DOCX and image+table PDF builders.
pub fn generate_all(cfg: &Config, out_dir: &Path) -> Result<Vec<FixtureRecord>> {
    ensure_dir(out_dir)?;

    let logo = logo::build(&cfg.generator).with_context(|| "building logo")?;

    let mut records = Vec::with_capacity(ALL.len());
    let mut emit = |name: &str, bytes: &[u8]| -> Result<()> {
        let path = out_dir.join(name);
        write_file(&path, bytes)?;
        let record = FixtureRecord {
            name: name.to_string(),
            bytes: bytes.len() as u64,
            sha256: sha256_hex(bytes),
        };
        info!("wrote {} bytes={} sha256={}", path.display(), record.bytes, record.sha256);
        records.push(record);
        Ok(())
    };

    emit(LOGO_PNG, &logo.png)?;
    emit(SAMPLE_CSV, &csv_sample::build().with_context(|| "building CSV")?)?;
    emit(SAMPLE_XLSX, &xlsx::build().with_context(|| "building XLSX")?)?;
    emit(SAMPLE_DOCX, &docx::build(&logo).with_context(|| "building DOCX")?)?;
    emit(TEXT_PDF, &pdf::build_text().with_context(|| "building text PDF")?)?;
    emit(
        IMAGE_TABLE_PDF,
        &pdf::build_image_table(&logo).with_context(|| "building image+table PDF")?,
    )?;

    Ok(records)
}
