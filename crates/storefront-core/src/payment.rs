//! Payment validator - format checks on the mock payment form
//!
//! Checks run in a fixed order so the user always sees the same error first:
//! missing fields, then card number length, then CVV length. Lengths are
//! character counts of the trimmed input; no checksum is applied.

use crate::error::ValidationError;

/// Required card number length, in characters
pub const CARD_NUMBER_LENGTH: usize = 16;

/// Required CVV length, in characters
pub const CVV_LENGTH: usize = 3;

/// Submitted payment form. Transient: dropped right after validation.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PaymentForm {
    pub name: String,
    pub card_number: String,
    pub cvv: String,
}

impl PaymentForm {
    pub fn new(
        name: impl Into<String>,
        card_number: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        PaymentForm {
            name: name.into(),
            card_number: card_number.into(),
            cvv: cvv.into(),
        }
    }
}

// Card data never reaches logs.
impl std::fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentForm")
            .field("name", &self.name)
            .field("card_number", &"<redacted>")
            .field("cvv", &"<redacted>")
            .finish()
    }
}

/// Form fields, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    Name,
    CardNumber,
    Cvv,
}

impl std::fmt::Display for PaymentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentField::Name => write!(f, "name"),
            PaymentField::CardNumber => write!(f, "card number"),
            PaymentField::Cvv => write!(f, "CVV"),
        }
    }
}

/// A form that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPayment {
    /// Trimmed name, used as the confirmed order's customer name
    pub customer_name: String,
}

/// Validate a payment form
pub fn validate(form: &PaymentForm) -> Result<ValidPayment, ValidationError> {
    let name = form.name.trim();
    let card_number = form.card_number.trim();
    let cvv = form.cvv.trim();

    for (field, value) in [
        (PaymentField::Name, name),
        (PaymentField::CardNumber, card_number),
        (PaymentField::Cvv, cvv),
    ] {
        if value.is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    let card_length = card_number.chars().count();
    if card_length != CARD_NUMBER_LENGTH {
        return Err(ValidationError::InvalidCardNumber {
            length: card_length,
        });
    }

    let cvv_length = cvv.chars().count();
    if cvv_length != CVV_LENGTH {
        return Err(ValidationError::InvalidCvv { length: cvv_length });
    }

    Ok(ValidPayment {
        customer_name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CARD: &str = "4242424242424242";

    #[test]
    fn test_valid_form_returns_trimmed_name() {
        let form = PaymentForm::new("  Ada Lovelace ", CARD, "123");
        assert_eq!(
            validate(&form),
            Ok(ValidPayment {
                customer_name: "Ada Lovelace".into()
            })
        );
    }

    #[test]
    fn test_surrounding_whitespace_ignored_for_lengths() {
        let form = PaymentForm::new("A", format!(" {} ", CARD), "\t123\n");
        assert!(validate(&form).is_ok());
    }

    #[rstest]
    #[case("", CARD, "123", PaymentField::Name)]
    #[case("   ", CARD, "123", PaymentField::Name)]
    #[case("A", "", "123", PaymentField::CardNumber)]
    #[case("A", CARD, " ", PaymentField::Cvv)]
    #[case("", "", "", PaymentField::Name)]
    #[case("A", "", "", PaymentField::CardNumber)]
    fn test_missing_field(
        #[case] name: &str,
        #[case] card: &str,
        #[case] cvv: &str,
        #[case] expected: PaymentField,
    ) {
        let form = PaymentForm::new(name, card, cvv);
        assert_eq!(
            validate(&form),
            Err(ValidationError::MissingField(expected))
        );
    }

    #[rstest]
    #[case("123", 3)]
    #[case("42424242424242424", 17)]
    #[case("4242 4242 4242 42", 17)]
    fn test_invalid_card_number(#[case] card: &str, #[case] length: usize) {
        let form = PaymentForm::new("A", card, "123");
        assert_eq!(
            validate(&form),
            Err(ValidationError::InvalidCardNumber { length })
        );
    }

    #[test]
    fn test_card_checked_before_cvv() {
        let form = PaymentForm::new("A", "123", "12");
        assert_eq!(
            validate(&form),
            Err(ValidationError::InvalidCardNumber { length: 3 })
        );
    }

    #[test]
    fn test_missing_checked_before_format() {
        let form = PaymentForm::new("A", "123", "");
        assert_eq!(
            validate(&form),
            Err(ValidationError::MissingField(PaymentField::Cvv))
        );
    }

    #[rstest]
    #[case("12", 2)]
    #[case("1234", 4)]
    fn test_invalid_cvv(#[case] cvv: &str, #[case] length: usize) {
        let form = PaymentForm::new("A", CARD, cvv);
        assert_eq!(validate(&form), Err(ValidationError::InvalidCvv { length }));
    }

    #[test]
    fn test_length_is_character_count_not_digits() {
        let form = PaymentForm::new("A", "abcdefghijklmnop", "xyz");
        assert!(validate(&form).is_ok());
        let form = PaymentForm::new("A", "ééééééééééééééé", "123");
        assert_eq!(
            validate(&form),
            Err(ValidationError::InvalidCardNumber { length: 15 })
        );
    }

    #[test]
    fn test_debug_redacts_card_data() {
        let form = PaymentForm::new("A", CARD, "123");
        let debug = format!("{:?}", form);
        assert!(!debug.contains(CARD));
        assert!(!debug.contains("123"));
        assert!(debug.contains("<redacted>"));
    }
}
