// ---------------------------------------------------------------------------
// Formatting helpers shared by the printed table and the watch view
// ---------------------------------------------------------------------------

pub const MISSING: &str = "–";

/// `AbCd…WxYz` for long mints; short strings pass through.
pub fn short_mint(mint: &str) -> String {
    let chars: Vec<char> = mint.chars().collect();
    if chars.len() <= 9 {
        return mint.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Unit-interval value as a percentage with one decimal.
pub fn fmt_pct1(v: f64) -> String {
    format!("{:5.1}", v * 100.0)
}

/// Fractional return as a percentage with two decimals.
pub fn fmt_pct2(v: f64) -> String {
    format!("{:5.2}", v * 100.0)
}

pub fn fmt_opt2(v: Option<f64>) -> String {
    v.map_or_else(|| MISSING.to_string(), |x| format!("{x:5.2}"))
}

/// Whole number with comma thousands separators, e.g. `-12,345`.
pub fn fmt_thousands(v: f64) -> String {
    let rounded = format!("{:.0}", v.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if v < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
