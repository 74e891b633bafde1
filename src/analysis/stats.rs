//! Numeric helpers shared by the aggregation engine.
//!
//! Rounding is half-to-even on the exact binary value, so `round_int(2.5)` is
//! `2`, and `round_one_decimal(0.35)` is `0.3` because 0.35 is stored as 0.34999...

/// Round to the nearest integer, ties to even.
pub fn round_int(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Round to one decimal place using the exact decimal expansion of `value`.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// `part / whole * 100` rounded to one decimal, or `0.0` for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Element at index `n / 2` of the ascending-sorted values.
///
/// For an even count this is the upper of the two middle elements.
pub fn upper_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[sorted.len() / 2])
}

/// Format an amount as `$1,234,567`, rounded to whole units.
pub fn format_usd(amount: f64) -> String {
    let rounded = round_int(amount);
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// `"$min - $max"` with thousands separators.
pub fn format_salary_range(min: f64, max: f64) -> String {
    format!("{} - {}", format_usd(min), format_usd(max))
}
