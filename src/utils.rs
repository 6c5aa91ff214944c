/// Formats a dollar amount the way the dashboard axes and tooltips show it:
/// trillions/billions/millions to one decimal place, smaller amounts whole.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1e12 {
        format!("${:.1}T", amount / 1e12)
    } else if amount >= 1e9 {
        format!("${:.1}B", amount / 1e9)
    } else if amount >= 1e6 {
        format!("${:.1}M", amount / 1e6)
    } else {
        format!("${:.0}", amount)
    }
}

/// Rounds to one decimal place. Percentages throughout the derived views are
/// carried at this precision.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_tiers() {
        assert_eq!(format_amount(1_500_000_000_000.0), "$1.5T");
        assert_eq!(format_amount(3_250_000_000.0), "$3.2B");
        assert_eq!(format_amount(4_000_000.0), "$4.0M");
        assert_eq!(format_amount(123.4), "$123");
        assert_eq!(format_amount(0.0), "$0");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(100.0), 100.0);
    }
}
