// crates/drac-rs-wsman/src/validate.rs

//! Validation of caller-supplied values before they are sent to the controller.

use crate::error::WsmanError;
use log::debug;

/// Collects validation messages so that every problem can be reported at once.
///
/// The accumulator is owned by the caller and passed by `&mut`; it is not
/// shared between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Turns the collected messages into a single `InvalidParameterValue` error.
    pub fn into_result(self) -> Result<(), WsmanError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(WsmanError::InvalidParameterValue {
                reason: self.messages.join("; "),
            })
        }
    }
}

/// Records a message in `errors` if `value` is absent or not an integer.
///
/// Never fails; the outcome is only visible through `errors`.
pub fn validate_integer(value: Option<&str>, attr_name: &str, errors: &mut ValidationErrors) {
    match value {
        None => {
            debug!("Validation: '{}' not supplied", attr_name);
            errors.push(format!("'{}' is not supplied", attr_name));
        }
        Some(raw) if !is_integer_literal(raw) => {
            debug!("Validation: '{}' has non-integer value '{}'", attr_name, raw);
            errors.push(format!("'{}' is not an integer value", attr_name));
        }
        Some(_) => {}
    }
}

/// Decimal integer of any magnitude: surrounding whitespace, an optional
/// sign, and digits optionally grouped with single underscores (`1_000`).
fn is_integer_literal(raw: &str) -> bool {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    !digits.is_empty()
        && digits
            .split('_')
            .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value() {
        let mut errors = ValidationErrors::new();
        validate_integer(None, "port", &mut errors);
        assert_eq!(errors.messages(), ["'port' is not supplied"]);
    }

    #[test]
    fn test_non_integer_value() {
        let mut errors = ValidationErrors::new();
        validate_integer(Some("abc"), "port", &mut errors);
        assert_eq!(errors.messages(), ["'port' is not an integer value"]);
    }

    #[test]
    fn test_integer_value_leaves_accumulator_unchanged() {
        let mut errors = ValidationErrors::new();
        errors.push("earlier problem");
        validate_integer(Some("42"), "port", &mut errors);
        assert_eq!(errors.messages(), ["earlier problem"]);
    }

    #[test]
    fn test_integer_syntax() {
        for ok in ["0", "-7", "+12", " 42 ", "1_000", "123456789012345678901234567890"] {
            assert!(is_integer_literal(ok), "{ok:?} should be accepted");
        }
        for bad in ["", " ", "-", "4.2", "1e3", "_1", "1__0", "1_", "0x10", "4 2"] {
            assert!(!is_integer_literal(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_accumulates_across_fields() {
        let mut errors = ValidationErrors::new();
        validate_integer(None, "start_lba", &mut errors);
        validate_integer(Some("10"), "size_mb", &mut errors);
        validate_integer(Some("ten"), "stripe_size", &mut errors);

        assert_eq!(errors.messages().len(), 2);
        let err = errors.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter value: 'start_lba' is not supplied; \
             'stripe_size' is not an integer value"
        );
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
