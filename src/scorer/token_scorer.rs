use crate::scorer::policy::ScoringPolicy;
use crate::types::{ScoreBundle, TokenSnapshotRecord};

/// Score one snapshot record. Pure: no I/O, no clock, no shared state.
pub fn score_record(r: &TokenSnapshotRecord, policy: &ScoringPolicy) -> ScoreBundle {
    let ranges = &policy.ranges;

    let safety = safety_score(r, policy);

    let liq = ranges.tvl_usd.apply(r.tvl_usd);

    // Sign is direction, magnitude is cost.
    let impact = ranges.impact_1k_pct.apply(r.impact_1k_pct.map(f64::abs));
    let spread = ranges.spread_pct.apply(r.spread_pct);
    let mkt = blend(policy.mkt_impact_share, impact, spread);

    let momentum = blend(
        policy.momentum_5m_share,
        ranges.r_5m.apply(Some(r.r_5m)),
        ranges.r_15m.apply(Some(r.r_15m)),
    );

    let flows = blend(
        policy.flows_net_buy_share,
        ranges.net_buy_usd_5m.apply(Some(r.net_buy_usd_5m)),
        ranges.unique_buyers_5m.apply(Some(r.unique_buyers_5m as f64)),
    );

    let distr = ranges.top10_pct.apply(r.top10_pct);

    let w = &policy.weights;
    let score = w.safety * safety
        + w.liq * liq
        + w.mkt * mkt
        + w.momentum * momentum
        + w.flows * flows
        + w.distr * distr;

    ScoreBundle {
        score: score.clamp(0.0, 1.0),
        safety,
        liq,
        mkt,
        momentum,
        flows,
        distr,
    }
}

/// Score a batch. Output is 1:1 with input and in the same order.
pub fn score_all(records: &[TokenSnapshotRecord], policy: &ScoringPolicy) -> Vec<ScoreBundle> {
    records.iter().map(|r| score_record(r, policy)).collect()
}

fn safety_score(r: &TokenSnapshotRecord, policy: &ScoringPolicy) -> f64 {
    let flags = [
        r.mint_authority_null == 1,
        r.freeze_authority_null == 1,
        r.token2022_danger == 0,
        r.lp_verified == 1,
    ];
    let base: f64 = flags
        .iter()
        .map(|&ok| if ok { policy.safety_flag_weight } else { 0.0 })
        .sum();

    let (min_dec, max_dec) = policy.decimals_ok;
    let decimals_factor = if (min_dec..=max_dec).contains(&r.decimals) {
        1.0
    } else {
        policy.decimals_penalty
    };

    base * decimals_factor
}

/// `share * a + (1 - share) * b`
fn blend(share: f64, a: f64, b: f64) -> f64 {
    share * a + (1.0 - share) * b
}
