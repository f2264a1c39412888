// src/request.rs - Validated transmission request
use thiserror::Error;

/// Argument problems, all detected before any pin is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Missing required arguments")]
    Count,
    #[error("First argument must be a number")]
    Format(String),
    #[error("Number of repetitions must be at least 1")]
    Range(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionRequest {
    pub repetitions: i64,
    pub message: String,
}

impl TransmissionRequest {
    pub fn new(repetitions: i64, message: impl Into<String>) -> Result<Self, ArgumentError> {
        let request = Self {
            repetitions,
            message: message.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Parse the raw repetitions argument and build a request.
    pub fn parse(repetitions: &str, message: impl Into<String>) -> Result<Self, ArgumentError> {
        Self::new(parse_repetitions(repetitions)?, message)
    }

    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.repetitions < 1 {
            return Err(ArgumentError::Range(self.repetitions));
        }
        Ok(())
    }

    /// Repetition count once validated. Zero for an invalid request.
    pub fn passes(&self) -> u64 {
        u64::try_from(self.repetitions).unwrap_or(0)
    }
}

/// Integer parse that tolerates surrounding whitespace and a leading sign.
pub fn parse_repetitions(raw: &str) -> Result<i64, ArgumentError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ArgumentError::Format(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repetitions() {
        assert_eq!(parse_repetitions("4"), Ok(4));
        assert_eq!(parse_repetitions(" 12 "), Ok(12));
        assert_eq!(parse_repetitions("+3"), Ok(3));
        assert_eq!(parse_repetitions("-2"), Ok(-2));
        assert_eq!(parse_repetitions("four"), Err(ArgumentError::Format("four".into())));
        assert_eq!(parse_repetitions("2.5"), Err(ArgumentError::Format("2.5".into())));
        assert_eq!(parse_repetitions(""), Err(ArgumentError::Format("".into())));
    }

    #[test]
    fn test_range_validation() {
        assert_eq!(TransmissionRequest::new(0, "A"), Err(ArgumentError::Range(0)));
        assert_eq!(TransmissionRequest::new(-5, "A"), Err(ArgumentError::Range(-5)));
        let request = TransmissionRequest::new(1, "A").unwrap();
        assert_eq!(request.passes(), 1);
    }

    #[test]
    fn test_parse_request() {
        let request = TransmissionRequest::parse("3", "hello ESP32").unwrap();
        assert_eq!(request.repetitions, 3);
        assert_eq!(request.message, "hello ESP32");
        assert!(matches!(
            TransmissionRequest::parse("x", "hi"),
            Err(ArgumentError::Format(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ArgumentError::Format("x".into()).to_string(),
            "First argument must be a number"
        );
        assert_eq!(
            ArgumentError::Range(0).to_string(),
            "Number of repetitions must be at least 1"
        );
    }
}
