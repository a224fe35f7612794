//! Form Validation
//!
//! Same rules as the terminal dashboard: months are integers in 1-12,
//! feature lists are comma-separated finite numbers.

pub fn parse_month(raw: &str) -> Result<u8, String> {
    match raw.trim().parse::<i64>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month as u8),
        _ => Err("Invalid input: Please enter a valid month number (1-12).".to_string()),
    }
}

pub fn parse_features(raw: &str) -> Result<Vec<f64>, String> {
    let invalid = || "Invalid input: Please enter valid numbers separated by commas.".to_string();

    if raw.trim().is_empty() {
        return Err(invalid());
    }

    raw.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(invalid)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        assert_eq!(parse_month("1"), Ok(1));
        assert_eq!(parse_month(" 12"), Ok(12));
        assert!(parse_month("13").is_err());
        assert!(parse_month("0").is_err());
        assert!(parse_month("six").is_err());
    }

    #[test]
    fn test_features() {
        assert_eq!(parse_features("25, 40000, 30"), Ok(vec![25.0, 40000.0, 30.0]));
        assert!(parse_features("25, x").is_err());
        assert!(parse_features("").is_err());
        assert!(parse_features("1,,2").is_err());
    }
}
