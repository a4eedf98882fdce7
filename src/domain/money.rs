use rust_decimal::Decimal;

/// Parses a user-supplied monetary amount.
///
/// Amounts are kept as exact decimals end to end so month totals never pick
/// up float rounding error. Inputs with more than two fractional digits are
/// rejected rather than rounded; accepted values are normalized to two
/// decimal places.
pub fn parse_amount(raw: &str, max: Decimal) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Enter an amount".to_string());
    }

    let amount: Decimal = trimmed.parse().map_err(|_| "Enter a valid dollar amount".to_string())?;

    if amount.scale() > 2 {
        return Err("Amounts are limited to whole cents".to_string());
    }
    if amount <= Decimal::ZERO {
        return Err("Enter an amount above zero".to_string());
    }
    if amount > max {
        return Err(format!("Amounts are capped at {max}"));
    }

    let mut normalized = amount;
    normalized.rescale(2);
    Ok(normalized)
}

/// Like [`parse_amount`] but zero is allowed; used for the monthly budget,
/// which a user may clear back to nothing.
pub fn parse_budget(raw: &str, max: Decimal) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Enter a budget amount".to_string());
    }

    let amount: Decimal = trimmed.parse().map_err(|_| "Enter a valid dollar amount".to_string())?;

    if amount.scale() > 2 {
        return Err("Amounts are limited to whole cents".to_string());
    }
    if amount < Decimal::ZERO {
        return Err("Budgets cannot be negative".to_string());
    }
    if amount > max {
        return Err(format!("Amounts are capped at {max}"));
    }

    let mut normalized = amount;
    normalized.rescale(2);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MAX: Decimal = dec!(1_000_000);

    #[test]
    fn accepts_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("42", MAX), Ok(dec!(42.00)));
        assert_eq!(parse_amount("10.10", MAX), Ok(dec!(10.10)));
        assert_eq!(parse_amount(" 7.5 ", MAX), Ok(dec!(7.50)));
    }

    #[test]
    fn normalizes_to_two_decimal_places() {
        let parsed = parse_amount("42", MAX).expect("whole amount");
        assert_eq!(parsed.scale(), 2);
        assert_eq!(parsed.to_string(), "42.00");
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert!(parse_amount("0.00", MAX).is_err());
        assert!(parse_amount("0", MAX).is_err());
        assert!(parse_amount("-5", MAX).is_err());
    }

    #[test]
    fn rejects_sub_cent_precision_and_garbage() {
        assert!(parse_amount("1.999", MAX).is_err());
        assert!(parse_amount("12.3.4", MAX).is_err());
        assert!(parse_amount("ten", MAX).is_err());
        assert!(parse_amount("", MAX).is_err());
    }

    #[test]
    fn rejects_amounts_over_the_cap() {
        assert!(parse_amount("1000000.01", MAX).is_err());
        assert_eq!(parse_amount("1000000", MAX), Ok(dec!(1_000_000.00)));
    }

    #[test]
    fn summation_stays_exact() {
        let a = parse_amount("10.10", MAX).expect("amount");
        let total = a + a + a;
        assert_eq!(total, dec!(30.30));
        assert_eq!(total.to_string(), "30.30");
    }

    #[test]
    fn budget_allows_zero_but_not_negative() {
        assert_eq!(parse_budget("0", MAX), Ok(dec!(0.00)));
        assert_eq!(parse_budget("1250.75", MAX), Ok(dec!(1250.75)));
        assert!(parse_budget("-1", MAX).is_err());
        assert!(parse_budget("1.005", MAX).is_err());
    }
}
