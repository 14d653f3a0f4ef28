use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following VALUFEED-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Datastore/connection errors
/// - **2000-2999**: Query errors
/// - **3000-3999**: Input/configuration errors
/// - **5000-5999**: Internal errors
///
/// Codes are stable across versions (semver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Datastore Errors (1000-1999) ===
    /// VALUFEED-1001: Database file not found at configured path
    DatabaseNotFound = 1001,
    /// VALUFEED-1002: Failed to open database connection
    ConnectionFailed = 1002,

    // === Query Errors (2000-2999) ===
    /// VALUFEED-2001: Query execution failed
    QueryFailed = 2001,
    /// VALUFEED-2002: Requested field/column does not exist
    FieldNotFound = 2002,
    /// VALUFEED-2003: Configured table does not exist
    TableNotFound = 2003,

    // === Input/Configuration Errors (3000-3999) ===
    /// VALUFEED-3001: Required input missing or blank
    MissingInput = 3001,
    /// VALUFEED-3002: Identifier contains forbidden characters
    InvalidIdentifier = 3002,
    /// VALUFEED-3003: Input could not be coerced to the expected type
    InvalidInput = 3003,
    /// VALUFEED-3004: Configuration could not be loaded or validated
    InvalidConfig = 3004,

    // === Internal Errors (5000-5999) ===
    /// VALUFEED-5001: Serialization/deserialization failed
    SerializationFailed = 5001,
    /// VALUFEED-5002: Unexpected internal state
    Internal = 5002,

    /// VALUFEED-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "VALUFEED-2002")
    pub fn as_str(&self) -> String {
        format!("VALUFEED-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Datastore,
            2000..=2999 => ErrorCategory::Query,
            3000..=3999 => ErrorCategory::Input,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let num: u16 = s
            .strip_prefix("VALUFEED-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::DatabaseNotFound),
            1002 => Ok(Self::ConnectionFailed),
            2001 => Ok(Self::QueryFailed),
            2002 => Ok(Self::FieldNotFound),
            2003 => Ok(Self::TableNotFound),
            3001 => Ok(Self::MissingInput),
            3002 => Ok(Self::InvalidIdentifier),
            3003 => Ok(Self::InvalidInput),
            3004 => Ok(Self::InvalidConfig),
            5001 => Ok(Self::SerializationFailed),
            5002 => Ok(Self::Internal),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Datastore,
    Query,
    Input,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_formatting() {
        assert_eq!(ErrorCode::DatabaseNotFound.as_str(), "VALUFEED-1001");
        assert_eq!(ErrorCode::QueryFailed.as_str(), "VALUFEED-2001");
        assert_eq!(ErrorCode::Unknown.as_str(), "VALUFEED-9999");
    }

    #[test]
    fn test_error_code_parsing() {
        assert_eq!(
            ErrorCode::try_from("VALUFEED-1001".to_string()).unwrap(),
            ErrorCode::DatabaseNotFound
        );
        assert_eq!(
            ErrorCode::try_from("VALUFEED-9999".to_string()).unwrap(),
            ErrorCode::Unknown
        );
    }

    #[test]
    fn test_error_code_parsing_errors() {
        assert!(ErrorCode::try_from("INVALID".to_string()).is_err());
        assert!(ErrorCode::try_from("VALUFEED-0000".to_string()).is_err());
        assert!(ErrorCode::try_from("VALUFEED-ABC".to_string()).is_err());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCode::DatabaseNotFound.category(),
            ErrorCategory::Datastore
        );
        assert_eq!(ErrorCode::FieldNotFound.category(), ErrorCategory::Query);
        assert_eq!(ErrorCode::MissingInput.category(), ErrorCategory::Input);
        assert_eq!(ErrorCode::Internal.category(), ErrorCategory::Internal);
        assert_eq!(ErrorCode::Unknown.category(), ErrorCategory::Internal);
    }
}
