use std::fmt;
use thiserror::Error;

/// 所有網路類錯誤共用的使用者訊息
pub const GENERIC_PREMIUM_ERROR: &str = "Error calculating premium. Please try again later.";

/// 年齡超出範圍時顯示的訊息（下限 18 並未實際檢查）
pub const AGE_RANGE_MESSAGE: &str = "Ages must be between 18 and 65.";

/// 單一欄位的驗證失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Form validation failed: {}", join_field_errors(.errors))]
    ValidationError { errors: Vec<FieldError> },

    #[error("Invalid age value: '{token}' is not a whole number")]
    AgeParseError { token: String },

    #[error("Age {age} exceeds the maximum of 65")]
    AgeOutOfRangeError { age: String },

    #[error("Invalid value '{value}' for {field}. Allowed: {allowed}")]
    InvalidChoiceError {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Premium service returned HTTP {status}")]
    StatusError { status: u16 },

    #[error("Malformed premium response: {message}")]
    MalformedResponseError { message: String },

    #[error("A premium calculation is already in progress")]
    SubmissionInFlight,

    #[error("Cart index {index} is out of range (cart has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parsing error: {message}")]
    ConfigParseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Session,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QuoteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuoteError::ValidationError { .. }
            | QuoteError::AgeParseError { .. }
            | QuoteError::AgeOutOfRangeError { .. }
            | QuoteError::InvalidChoiceError { .. } => ErrorCategory::Validation,
            QuoteError::ApiError(_)
            | QuoteError::StatusError { .. }
            | QuoteError::MalformedResponseError { .. } => ErrorCategory::Network,
            QuoteError::SubmissionInFlight | QuoteError::IndexOutOfRange { .. } => {
                ErrorCategory::Session
            }
            QuoteError::InvalidConfigValueError { .. }
            | QuoteError::ConfigParseError { .. } => ErrorCategory::Configuration,
            QuoteError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Session => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 網路錯誤一律收斂成同一則訊息，細節只寫進日誌
    pub fn user_friendly_message(&self) -> String {
        match self {
            QuoteError::ValidationError { errors } => errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("\n"),
            QuoteError::AgeOutOfRangeError { .. } => AGE_RANGE_MESSAGE.to_string(),
            QuoteError::AgeParseError { token } => {
                format!("'{}' is not a valid age. Use whole numbers, e.g. 25,35,40", token)
            }
            QuoteError::InvalidChoiceError { field, allowed, .. } => {
                format!("Please select a valid {} ({})", field, allowed)
            }
            QuoteError::ApiError(_)
            | QuoteError::StatusError { .. }
            | QuoteError::MalformedResponseError { .. } => GENERIC_PREMIUM_ERROR.to_string(),
            QuoteError::SubmissionInFlight => {
                "Please wait for the current premium calculation to finish.".to_string()
            }
            QuoteError::IndexOutOfRange { index, len } => {
                if *len == 0 {
                    format!("No cart item at position {}: the cart is empty.", index)
                } else {
                    format!(
                        "No cart item at position {}. Valid positions are 0 to {}.",
                        index,
                        len - 1
                    )
                }
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QuoteError::ValidationError { .. } => "Fill in every field and submit again",
            QuoteError::AgeParseError { .. } => "Enter ages as comma-separated whole numbers",
            QuoteError::AgeOutOfRangeError { .. } => "Remove or correct ages above 65",
            QuoteError::InvalidChoiceError { .. } => "Pick one of the listed options",
            QuoteError::ApiError(_) => "Check your network connection and the service endpoint",
            QuoteError::StatusError { .. } => "The premium service may be unavailable; try again later",
            QuoteError::MalformedResponseError { .. } => {
                "Verify the endpoint points at the premium calculation API"
            }
            QuoteError::SubmissionInFlight => "Wait for the pending request to complete",
            QuoteError::IndexOutOfRange { .. } => "Run `cart` to see valid positions",
            QuoteError::InvalidConfigValueError { .. } => "Correct the configuration value and restart",
            QuoteError::ConfigParseError { .. } => "Make sure the config file is valid TOML",
            QuoteError::IoError(_) => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_share_generic_message() {
        let status = QuoteError::StatusError { status: 503 };
        let malformed = QuoteError::MalformedResponseError {
            message: "missing total_premium".to_string(),
        };

        assert_eq!(status.user_friendly_message(), GENERIC_PREMIUM_ERROR);
        assert_eq!(malformed.user_friendly_message(), GENERIC_PREMIUM_ERROR);
        assert_eq!(status.category(), ErrorCategory::Network);
        assert_eq!(status.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_validation_message_lists_each_field() {
        let err = QuoteError::ValidationError {
            errors: vec![
                FieldError::new("ages", "Please enter ages!"),
                FieldError::new("tenure", "Please select tenure!"),
            ],
        };

        let message = err.user_friendly_message();
        assert!(message.contains("Please enter ages!"));
        assert!(message.contains("Please select tenure!"));
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_age_range_message_keeps_documented_bounds() {
        let err = QuoteError::AgeOutOfRangeError {
            age: "70".to_string(),
        };
        assert_eq!(err.user_friendly_message(), AGE_RANGE_MESSAGE);
    }

    #[test]
    fn test_index_out_of_range_message() {
        let empty = QuoteError::IndexOutOfRange { index: 0, len: 0 };
        assert!(empty.user_friendly_message().contains("empty"));

        let err = QuoteError::IndexOutOfRange { index: 5, len: 2 };
        assert!(err.user_friendly_message().contains("0 to 1"));
    }
}
