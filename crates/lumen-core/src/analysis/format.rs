//! Presentation formatting for figures quoted in insights

/// Group an integer's digits in thousands: 1345000 -> "1,345,000"
pub fn group_thousands(value: u64) -> String {
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

/// Whole-dollar currency: 1345000.0 -> "$1,345,000"
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Count with thousands separators
pub fn format_count(value: u64) -> String {
    group_thousands(value)
}

/// Percentage with one decimal: 7.7166 -> "7.7%"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(15847), "15,847");
        assert_eq!(group_thousands(1_345_000), "1,345,000");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(267_000.0), "$267,000");
        assert_eq!(format_currency(1_345_000.4), "$1,345,000");
        assert_eq!(format_currency(-2_500.0), "-$2,500");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(7.716_666), "7.7%");
        assert_eq!(format_percent(-2.3), "-2.3%");
    }
}
