//! Display formatting for currency, counts and percentages

/// Whole-dollar USD with thousands separators, e.g. `$140,000` or `-$1,250`
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Integer with thousands separators
pub fn count(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(value.unsigned_abs()))
}

/// Percentage with one decimal place, e.g. `30.0%`
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(140_000.0), "$140,000");
        assert_eq!(currency(187_499.6), "$187,500");
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(-1_250.4), "-$1,250");
        assert_eq!(currency(999.0), "$999");
        assert_eq!(currency(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(0), "0");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(-25_000), "-25,000");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(30.0), "30.0%");
        assert_eq!(percent(16.7), "16.7%");
    }
}
