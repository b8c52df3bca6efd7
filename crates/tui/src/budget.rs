/// Share of the category limit already spent, clamped to 0..=100.
///
/// A missing or zero limit yields 0 rather than a division artifact.
pub fn percent_used(total_spent: f64, category_limit: f64) -> f64 {
    let ratio = total_spent / category_limit * 100.0;
    if ratio.is_finite() {
        ratio.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn is_over_budget(total_spent: f64, category_limit: f64) -> bool {
    total_spent > category_limit
}

/// Format an amount as SAR with thousands separators: SAR 1,234.56
pub fn format_sar(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-SAR {grouped}.{dec_part}")
    } else {
        format!("SAR {grouped}.{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_clamps_overspend_to_hundred() {
        assert_eq!(percent_used(150.0, 100.0), 100.0);
        assert!(is_over_budget(150.0, 100.0));
    }

    #[test]
    fn percent_within_limit() {
        assert_eq!(percent_used(50.0, 200.0), 25.0);
        assert!(!is_over_budget(50.0, 200.0));
    }

    #[test]
    fn percent_floors_negative_spend_at_zero() {
        assert_eq!(percent_used(-10.0, 100.0), 0.0);
    }

    #[test]
    fn percent_handles_zero_limit() {
        assert_eq!(percent_used(120.0, 0.0), 0.0);
        assert_eq!(percent_used(0.0, 0.0), 0.0);
    }

    #[test]
    fn exact_limit_is_not_over_budget() {
        assert_eq!(percent_used(100.0, 100.0), 100.0);
        assert!(!is_over_budget(100.0, 100.0));
    }

    #[test]
    fn sar_formatting() {
        assert_eq!(format_sar(1234.56), "SAR 1,234.56");
        assert_eq!(format_sar(0.0), "SAR 0.00");
        assert_eq!(format_sar(1_000_000.989), "SAR 1,000,000.99");
        assert_eq!(format_sar(-500.0), "-SAR 500.00");
        assert_eq!(format_sar(42.1), "SAR 42.10");
    }
}
