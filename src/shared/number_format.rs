//! Number formatting for human-readable report text

/// Format with a fixed number of decimals and comma thousands separators.
///
/// `1234567.891` with 2 decimals becomes `1,234,567.89`. Non-finite values are written
/// as `nan`, `inf` or `-inf`. A negative value that rounds to zero prints as `-0.00`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3 + 1);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Negative values keep their sign even when they round to zero
    let sign = if value.is_sign_negative() { "-" } else { "" };

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
