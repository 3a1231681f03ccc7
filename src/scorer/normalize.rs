/// Map `x` linearly from `[lo, hi]` onto `[0, 1]`, clamped.
///
/// A missing or NaN value and a degenerate range (`lo == hi`) all yield `0.0`.
/// With `invert`, the clamped value is flipped so lower raw inputs score higher.
pub fn normalize(x: Option<f64>, lo: f64, hi: f64, invert: bool) -> f64 {
    let Some(x) = x.filter(|v| !v.is_nan()) else {
        return 0.0;
    };
    if hi == lo {
        return 0.0;
    }
    let v = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
    if invert {
        1.0 - v
    } else {
        v
    }
}
