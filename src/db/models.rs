//! Row types for the snapshot database written by the ingestion process.
//! Used by sqlx for typed queries.

use crate::types::TokenSnapshotRecord;

/// One `snapshots` row joined with `tokens`, with defaults already applied in SQL.
#[derive(Debug, sqlx::FromRow)]
pub struct SnapshotRow {
    pub mint: String,
    pub symbol: Option<String>,
    pub decimals: i64,
    pub mint_authority_null: i64,
    pub freeze_authority_null: i64,
    pub token2022_danger: i64,
    pub lp_verified: i64,
    pub tvl_usd: Option<f64>,
    pub impact_1k_pct: Option<f64>,
    pub spread_pct: Option<f64>,
    pub r_1m: f64,
    pub r_5m: f64,
    pub r_15m: f64,
    pub volume_5m: f64,
    pub unique_buyers_5m: i64,
    pub net_buy_usd_5m: f64,
    pub top10_pct: Option<f64>,
}

impl From<SnapshotRow> for TokenSnapshotRecord {
    fn from(row: SnapshotRow) -> Self {
        Self {
            mint: row.mint,
            symbol: row.symbol,
            decimals: row.decimals,
            mint_authority_null: row.mint_authority_null,
            freeze_authority_null: row.freeze_authority_null,
            token2022_danger: row.token2022_danger,
            lp_verified: row.lp_verified,
            tvl_usd: row.tvl_usd,
            impact_1k_pct: row.impact_1k_pct,
            spread_pct: row.spread_pct,
            r_1m: row.r_1m,
            r_5m: row.r_5m,
            r_15m: row.r_15m,
            volume_5m: row.volume_5m,
            unique_buyers_5m: row.unique_buyers_5m,
            net_buy_usd_5m: row.net_buy_usd_5m,
            top10_pct: row.top10_pct,
        }
    }
}

/// Raw sample shown by `inspect`; NULLs are left as-is.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SampleRow {
    pub mint: String,
    pub symbol: Option<String>,
    pub decimals: Option<i64>,
    pub mint_authority_null: Option<i64>,
    pub freeze_authority_null: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbOverview {
    pub tables: Vec<String>,
    pub last_ts: Option<i64>,
    pub rows_in_last_snapshot: i64,
    pub sample: Vec<SampleRow>,
}
