//! One-shot OCR and analysis over a local file.

use anyhow::{Context, Result};
use poseidon_config::PoseidonConfig;
use poseidon_core::FallbackData;
use poseidon_understanding::{ImageAnalysis, TextExtractor};
use std::io::Write;
use std::path::Path;

use crate::build_state;

pub async fn ocr(config: &PoseidonConfig, file: &Path, out: &mut impl Write) -> Result<()> {
    let bytes = read_image(file).await?;
    let state = build_state(config);
    write_json(out, state.ocr.extract_text(&bytes))
}

pub async fn analyze(config: &PoseidonConfig, file: &Path, out: &mut impl Write) -> Result<()> {
    let bytes = read_image(file).await?;
    let state = build_state(config);
    write_json(out, state.analyzer.analyze(&bytes).await)
}

async fn read_image(file: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read image file: {}", file.display()))
}

fn write_json(out: &mut impl Write, data: FallbackData) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &data)?;
    writeln!(out)?;
    Ok(())
}
