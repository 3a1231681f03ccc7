use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::EXPORT_PRECISION;
use crate::error::Result;
use crate::types::ScoredToken;

#[derive(Debug, Serialize)]
pub struct ExportEntry<'a> {
    pub mint: &'a str,
    pub symbol: Option<&'a str>,
    pub score: f64,
    pub safety: f64,
}

pub fn export_entries(items: &[ScoredToken]) -> Vec<ExportEntry<'_>> {
    items
        .iter()
        .map(|it| ExportEntry {
            mint: &it.record.mint,
            symbol: it.record.symbol.as_deref(),
            score: round_to(it.bundle.score, EXPORT_PRECISION),
            safety: round_to(it.bundle.safety, EXPORT_PRECISION),
        })
        .collect()
}

/// Write the ranked list as pretty JSON, creating parent directories as needed.
pub async fn write_json(path: &Path, items: &[ScoredToken]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_string_pretty(&export_entries(items))?;
    tokio::fs::write(path, body).await?;
    debug!(path = %path.display(), entries = items.len(), "export written");
    Ok(())
}

fn round_to(v: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (v * factor).round() / factor
}
