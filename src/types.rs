// ---------------------------------------------------------------------------
// Snapshot input
// ---------------------------------------------------------------------------

/// One token's metrics at a single snapshot timestamp.
///
/// Flags are stored as 0/1 integers exactly as the ingestion process writes
/// them. The four `Option` fields keep NULL distinct from zero: a missing
/// TVL is not the same as a TVL of $0.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSnapshotRecord {
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

    /// Fractional returns (0.01 = +1%).
    pub r_1m: f64,
    pub r_5m: f64,
    pub r_15m: f64,

    pub volume_5m: f64,
    pub unique_buyers_5m: i64,
    pub net_buy_usd_5m: f64,

    /// Fraction of supply held by the ten largest holders.
    pub top10_pct: Option<f64>,
}

/// All records captured at one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub ts: i64,
    pub records: Vec<TokenSnapshotRecord>,
}

// ---------------------------------------------------------------------------
// Scoring output
// ---------------------------------------------------------------------------

/// Composite score plus the six sub-scores it was built from. Every field is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBundle {
    pub score: f64,
    pub safety: f64,
    pub liq: f64,
    pub mkt: f64,
    pub momentum: f64,
    pub flows: f64,
    pub distr: f64,
}

/// A record paired with its score, as handed to the ranker and reporters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredToken {
    pub record: TokenSnapshotRecord,
    pub bundle: ScoreBundle,
}

impl ScoredToken {
    pub fn display_symbol(&self) -> &str {
        self.record.symbol.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::TokenSnapshotRecord;

    /// A token with every metric at its neutral/zero value and all absent-capable fields missing.
    pub fn blank_record(mint: &str) -> TokenSnapshotRecord {
        TokenSnapshotRecord {
            mint: mint.to_string(),
            symbol: None,
            decimals: 0,
            mint_authority_null: 0,
            freeze_authority_null: 0,
            token2022_danger: 0,
            lp_verified: 0,
            tvl_usd: None,
            impact_1k_pct: None,
            spread_pct: None,
            r_1m: 0.0,
            r_5m: 0.0,
            r_15m: 0.0,
            volume_5m: 0.0,
            unique_buyers_5m: 0,
            net_buy_usd_5m: 0.0,
            top10_pct: None,
        }
    }

    /// Safe, liquid, tight-spread token with modest momentum.
    pub fn healthy_record(mint: &str) -> TokenSnapshotRecord {
        TokenSnapshotRecord {
            symbol: Some("GOOD".to_string()),
            decimals: 6,
            mint_authority_null: 1,
            freeze_authority_null: 1,
            token2022_danger: 0,
            lp_verified: 1,
            tvl_usd: Some(250_000.0),
            impact_1k_pct: Some(0.8),
            spread_pct: Some(0.15),
            r_1m: 0.002,
            r_5m: 0.01,
            r_15m: 0.02,
            volume_5m: 42_000.0,
            unique_buyers_5m: 90,
            net_buy_usd_5m: 12_500.0,
            top10_pct: Some(0.35),
            ..blank_record(mint)
        }
    }
}
