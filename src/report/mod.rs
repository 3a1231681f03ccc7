pub mod export;
pub mod format;
pub mod table;

use std::io::Write;

use crate::error::Result;
use crate::types::ScoredToken;

/// Print the `Top-K @ ts=..` heading followed by the ranking table to stdout.
pub fn print_ranking(ts: i64, total: usize, items: &[ScoredToken]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", heading(ts, total, items.len()))?;
    for line in table::render_table(items) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn heading(ts: i64, total: usize, shown: usize) -> String {
    format!("Top-{} @ ts={ts}", shown.min(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_uses_smaller_of_limit_and_total() {
        assert_eq!(heading(1700000000, 3, 3), "Top-3 @ ts=1700000000");
        assert_eq!(heading(42, 100, 25), "Top-25 @ ts=42");
    }
}
