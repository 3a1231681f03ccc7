use std::cmp::Ordering;

use crate::scorer::{score_all, ScoringPolicy};
use crate::types::{ScoredToken, TokenSnapshotRecord};

/// Score every record and order best-first.
///
/// Ties on score fall back to mint ascending so identical input always
/// produces identical output order.
pub fn rank(records: Vec<TokenSnapshotRecord>, policy: &ScoringPolicy) -> Vec<ScoredToken> {
    let bundles = score_all(&records, policy);
    let mut scored: Vec<ScoredToken> = records
        .into_iter()
        .zip(bundles)
        .map(|(record, bundle)| ScoredToken { record, bundle })
        .collect();
    scored.sort_by(compare);
    scored
}

/// Keep the first `k` entries of an already ranked list.
pub fn top(mut ranked: Vec<ScoredToken>, k: usize) -> Vec<ScoredToken> {
    ranked.truncate(k);
    ranked
}

fn compare(a: &ScoredToken, b: &ScoredToken) -> Ordering {
    b.bundle
        .score
        .total_cmp(&a.bundle.score)
        .then_with(|| a.record.mint.cmp(&b.record.mint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{blank_record, healthy_record};

    fn mints(ranked: &[ScoredToken]) -> Vec<&str> {
        ranked.iter().map(|t| t.record.mint.as_str()).collect()
    }

    #[test]
    fn orders_by_score_descending() {
        let records = vec![blank_record("low"), healthy_record("high")];
        let ranked = rank(records, &ScoringPolicy::DEFAULT);
        assert_eq!(mints(&ranked), vec!["high", "low"]);
        assert!(ranked[0].bundle.score > ranked[1].bundle.score);
    }

    #[test]
    fn ties_break_on_mint_ascending() {
        let records = vec![
            healthy_record("ccc"),
            healthy_record("aaa"),
            blank_record("zzz"),
            healthy_record("bbb"),
        ];
        let ranked = rank(records, &ScoringPolicy::DEFAULT);
        assert_eq!(mints(&ranked), vec!["aaa", "bbb", "ccc", "zzz"]);
    }

    #[test]
    fn input_order_does_not_change_output() {
        let forward = vec![healthy_record("x"), blank_record("y"), healthy_record("w")];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(
            rank(forward, &ScoringPolicy::DEFAULT),
            rank(backward, &ScoringPolicy::DEFAULT)
        );
    }

    #[test]
    fn no_records_dropped() {
        let records: Vec<_> = (0..50).map(|i| blank_record(&format!("m{i:02}"))).collect();
        assert_eq!(rank(records, &ScoringPolicy::DEFAULT).len(), 50);
    }

    #[test]
    fn top_truncates_but_never_pads() {
        let records = vec![healthy_record("a"), blank_record("b"), blank_record("c")];
        let ranked = rank(records, &ScoringPolicy::DEFAULT);
        assert_eq!(top(ranked.clone(), 2).len(), 2);
        assert_eq!(top(ranked, 10).len(), 3);
    }
}
