// Validation utilities module
// Provides custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a money amount is strictly positive
pub fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        Err(ValidationError::new("amount_must_be_positive"))
    } else {
        Ok(())
    }
}

/// Validates that a location string is non-empty after trimming
pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    if location.trim().is_empty() {
        Err(ValidationError::new("location_required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_amount() {
        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
        assert!(validate_positive_amount(&dec!(0)).is_err());
        assert!(validate_positive_amount(&dec!(-5)).is_err());
    }

    #[test]
    fn test_location() {
        assert!(validate_location("Chennai").is_ok());
        assert!(validate_location("   ").is_err());
        assert!(validate_location("").is_err());
    }
}
