use crate::errors::ReportError;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("static pattern"));
static DNI_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("static pattern"));

pub fn sanitize_digits(value: &str) -> String {
    NON_DIGITS.replace_all(value, "").into_owned()
}

pub fn is_valid_dni(value: &str) -> bool {
    DNI_PATTERN.is_match(value)
}

pub fn validate_dni(raw: &str) -> Result<&str, ReportError> {
    let dni = raw.trim();
    if is_valid_dni(dni) {
        Ok(dni)
    } else {
        Err(ReportError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_only_digits() {
        assert_eq!(sanitize_digits("12a34-56 78"), "12345678");
        assert_eq!(sanitize_digits("abc"), "");
        assert_eq!(sanitize_digits("١٢٣"), "");
        assert_eq!(sanitize_digits("1234567890"), "1234567890");
    }

    #[test]
    fn validation_requires_exactly_eight_digits() {
        assert_eq!(validate_dni(" 12345678 ").unwrap(), "12345678");
        for bad in ["", "1234567", "123456789", "1234567a", "12 345678", "١٢٣٤٥٦٧٨"] {
            assert!(validate_dni(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
