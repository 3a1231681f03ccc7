//! Scoring policy: normalization ranges and aggregation weights.
//!
//! These are hand-set constants, not fitted values. `ScoringPolicy::DEFAULT`
//! is the production policy; tests pin every number in it.

use super::normalize::normalize;

/// Raw-value interval mapped onto [0, 1], optionally inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormRange {
    pub lo: f64,
    pub hi: f64,
    pub invert: bool,
}

impl NormRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi, invert: false }
    }

    /// Lower raw values score higher (cost and risk metrics).
    pub const fn inverted(lo: f64, hi: f64) -> Self {
        Self { lo, hi, invert: true }
    }

    pub fn apply(&self, x: Option<f64>) -> f64 {
        normalize(x, self.lo, self.hi, self.invert)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormRanges {
    pub tvl_usd: NormRange,
    /// Applied to `abs(impact_1k_pct)`.
    pub impact_1k_pct: NormRange,
    pub spread_pct: NormRange,
    pub r_5m: NormRange,
    pub r_15m: NormRange,
    pub net_buy_usd_5m: NormRange,
    pub unique_buyers_5m: NormRange,
    pub top10_pct: NormRange,
}

/// Composite weights. Must sum to 1.0 so the composite stays in [0, 1] without the clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub safety: f64,
    pub liq: f64,
    pub mkt: f64,
    pub momentum: f64,
    pub flows: f64,
    pub distr: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.safety + self.liq + self.mkt + self.momentum + self.flows + self.distr
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub ranges: NormRanges,
    pub weights: Weights,

    /// Per-flag weight inside the safety sub-score (four flags).
    pub safety_flag_weight: f64,
    /// Inclusive decimals range considered normal.
    pub decimals_ok: (i64, i64),
    /// Safety multiplier applied when decimals fall outside `decimals_ok`.
    pub decimals_penalty: f64,

    /// Weight of price impact inside market quality; spread gets the rest.
    pub mkt_impact_share: f64,
    /// Weight of the 5m return inside momentum; 15m gets the rest.
    pub momentum_5m_share: f64,
    /// Weight of net buy flow inside flows; unique buyers get the rest.
    pub flows_net_buy_share: f64,
}

impl ScoringPolicy {
    pub const DEFAULT: ScoringPolicy = ScoringPolicy {
        ranges: NormRanges {
            tvl_usd: NormRange::new(1e4, 1e6),
            impact_1k_pct: NormRange::inverted(0.0, 5.0),
            spread_pct: NormRange::inverted(0.0, 1.0),
            r_5m: NormRange::new(0.0, 0.05),
            r_15m: NormRange::new(0.0, 0.08),
            net_buy_usd_5m: NormRange::new(0.0, 100_000.0),
            unique_buyers_5m: NormRange::new(0.0, 300.0),
            top10_pct: NormRange::inverted(0.2, 0.9),
        },
        weights: Weights {
            safety: 0.35,
            liq: 0.20,
            mkt: 0.15,
            momentum: 0.15,
            flows: 0.10,
            distr: 0.05,
        },
        safety_flag_weight: 0.25,
        decimals_ok: (0, 12),
        decimals_penalty: 0.5,
        mkt_impact_share: 0.5,
        momentum_5m_share: 0.6,
        flows_net_buy_share: 0.6,
    };
}
