/// Percentage of `numerator` over `denominator`, rounded to `decimals`
/// places. Returns 0 when the denominator is 0 rather than dividing.
pub fn percent(numerator: u32, denominator: u32, decimals: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let scale = 10_f64.powi(decimals as i32);
    let raw = numerator as f64 / denominator as f64 * 100.0;
    (raw * scale).round() / scale
}
