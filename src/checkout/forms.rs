//! Card form validation
//!
//! Client-side checks for the deferred (card) channel. There is no payment
//! gateway; the details are validated, used to gate order submission, and
//! dropped.

use chrono::{Datelike, Utc};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, Validate)]
pub struct CardDetails {
    #[validate(
        length(min = 2, max = 50, message = "name must be 2 to 50 characters"),
        custom = "validate_card_holder"
    )]
    pub name_on_card: String,

    #[validate(custom = "validate_card_number")]
    pub card_number: String,

    #[validate(custom = "validate_expiry_date")]
    pub expiry_date: String,

    #[validate(custom = "validate_cvv")]
    pub cvv: String,
}

fn validate_card_holder(name: &str) -> Result<(), ValidationError> {
    if name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        Ok(())
    } else {
        Err(ValidationError::new("card_holder_letters_only"))
    }
}

fn validate_card_number(number: &str) -> Result<(), ValidationError> {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != 16 || !digits.iter().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("card_number_sixteen_digits"));
    }
    if digits.iter().all(|c| Some(c) == digits.first()) {
        return Err(ValidationError::new("card_number_repeated_digit"));
    }
    Ok(())
}

/// MM/YY, not expired, at most ten years out.
fn validate_expiry_date(value: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 2 {
        return Err(ValidationError::new("expiry_format"));
    }
    let (month, year) = (parts[0], parts[1]);
    if month.len() != 2 || year.len() != 2 {
        return Err(ValidationError::new("expiry_format"));
    }
    let month: u32 = month.parse().map_err(|_| ValidationError::new("expiry_format"))?;
    let year: i32 = year.parse().map_err(|_| ValidationError::new("expiry_format"))?;
    if !(1..=12).contains(&month) {
        return Err(ValidationError::new("expiry_format"));
    }
    let year = 2000 + year;
    let now = Utc::now();
    if (year, month) < (now.year(), now.month()) {
        return Err(ValidationError::new("card_expired"));
    }
    if year > now.year() + 10 {
        return Err(ValidationError::new("expiry_too_far_out"));
    }
    Ok(())
}

fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    if (3..=4).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("cvv_format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_card() -> CardDetails {
        CardDetails {
            name_on_card: "Omar Hassan".into(),
            card_number: "4111 1111 1111 1234".into(),
            expiry_date: "12/30".into(),
            cvv: "123".into(),
        }
    }

    #[test]
    fn test_valid_card_passes() {
        assert!(valid_card().validate().is_ok());
    }

    #[test]
    fn test_name_with_digits_is_rejected() {
        let mut card = valid_card();
        card.name_on_card = "Omar 3".into();
        assert!(card.validate().is_err());
    }

    #[test]
    fn test_card_number_length_and_repetition() {
        let mut card = valid_card();
        card.card_number = "1234".into();
        assert!(card.validate().is_err());

        card.card_number = "1111111111111111".into();
        assert!(card.validate().is_err());
    }

    #[test]
    fn test_expired_and_malformed_dates_are_rejected() {
        let mut card = valid_card();
        card.expiry_date = "01/20".into();
        assert!(card.validate().is_err());

        card.expiry_date = "13/30".into();
        assert!(card.validate().is_err());

        card.expiry_date = "1230".into();
        assert!(card.validate().is_err());

        card.expiry_date = "12/99".into();
        assert!(card.validate().is_err());
    }

    #[test]
    fn test_cvv_three_or_four_digits() {
        let mut card = valid_card();
        card.cvv = "12".into();
        assert!(card.validate().is_err());
        card.cvv = "1234".into();
        assert!(card.validate().is_ok());
        card.cvv = "12a".into();
        assert!(card.validate().is_err());
    }
}
