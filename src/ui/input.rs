//! Parsing for everything typed at a prompt. Each parser turns raw text into
//! a typed value or an `InputError` the console shows before asking again.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("{field} must be a number, got '{raw}'.")]
    NotANumber { field: &'static str, raw: String },
    #[error("{field} must be a whole number, got '{raw}'.")]
    NotAnInteger { field: &'static str, raw: String },
    #[error("Credits must be positive, got {0}.")]
    NonPositiveCredits(i64),
    #[error("Minimum GPA {min} is greater than maximum GPA {max}.")]
    InvertedRange { min: f64, max: f64 },
}

/// Trimmed, non-blank text.
pub fn required(field: &'static str, raw: &str) -> Result<String, InputError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(InputError::Required(field))
    } else {
        Ok(value.to_string())
    }
}

/// Blank means "keep the current value".
pub fn optional(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Any finite number. Grades are deliberately not range checked.
pub fn number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let value = raw.trim();
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(InputError::NotANumber {
            field,
            raw: value.to_string(),
        }),
    }
}

pub fn grade(raw: &str) -> Result<f64, InputError> {
    number("Grade", raw)
}

/// Course credit weight, a positive integer.
pub fn credits(raw: &str) -> Result<i64, InputError> {
    let value = raw.trim();
    let parsed = value
        .parse::<i64>()
        .map_err(|_| InputError::NotAnInteger {
            field: "Credits",
            raw: value.to_string(),
        })?;
    if parsed > 0 {
        Ok(parsed)
    } else {
        Err(InputError::NonPositiveCredits(parsed))
    }
}

/// Inclusive GPA bounds for the range search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpaRange {
    pub min: f64,
    pub max: f64,
}

impl GpaRange {
    pub fn new(min: f64, max: f64) -> Result<Self, InputError> {
        if min > max {
            Err(InputError::InvertedRange { min, max })
        } else {
            Ok(Self { min, max })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("Email", "  a@x.com \n"), Ok("a@x.com".to_string()));
        assert_eq!(required("Email", "   "), Err(InputError::Required("Email")));
    }

    #[test]
    fn optional_treats_blank_as_keep() {
        assert_eq!(optional(""), None);
        assert_eq!(optional("  \n"), None);
        assert_eq!(optional(" Bob "), Some("Bob".to_string()));
    }

    #[test]
    fn grades_accept_any_finite_number() {
        assert_eq!(grade("3.5"), Ok(3.5));
        assert_eq!(grade(" 120 "), Ok(120.0));
        assert_eq!(grade("-1"), Ok(-1.0));
        assert!(matches!(grade("A+"), Err(InputError::NotANumber { .. })));
        assert!(matches!(grade("NaN"), Err(InputError::NotANumber { .. })));
        assert!(matches!(grade("inf"), Err(InputError::NotANumber { .. })));
    }

    #[test]
    fn credits_must_be_positive_integers() {
        assert_eq!(credits("4"), Ok(4));
        assert_eq!(credits("0"), Err(InputError::NonPositiveCredits(0)));
        assert!(matches!(credits("2.5"), Err(InputError::NotAnInteger { .. })));
        assert!(matches!(credits(""), Err(InputError::NotAnInteger { .. })));
    }

    #[test]
    fn gpa_range_rejects_inverted_bounds() {
        assert_eq!(GpaRange::new(1.0, 1.0), Ok(GpaRange { min: 1.0, max: 1.0 }));
        assert_eq!(
            GpaRange::new(4.0, 2.0),
            Err(InputError::InvertedRange { min: 4.0, max: 2.0 })
        );
    }
}
