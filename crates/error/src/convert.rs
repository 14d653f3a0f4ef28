use crate::{ErrorCode, ErrorContext, ValufeedError};

impl From<rusqlite::Error> for ValufeedError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(sqlite_err, msg) => {
                let code = match sqlite_err.code {
                    rusqlite::ErrorCode::CannotOpen => ErrorCode::ConnectionFailed,
                    rusqlite::ErrorCode::NotADatabase => ErrorCode::ConnectionFailed,
                    _ => ErrorCode::QueryFailed,
                };
                ValufeedError::new(
                    code,
                    msg.clone().unwrap_or_else(|| sqlite_err.to_string()),
                )
            }
            // SQLite reports unknown columns/tables as prepare-time errors with
            // a "no such column"/"no such table" message.
            rusqlite::Error::SqlInputError { msg, .. } => {
                if msg.contains("no such column") {
                    ValufeedError::new(ErrorCode::FieldNotFound, msg.clone())
                        .with_hint("Check the field name against the table schema")
                } else if msg.contains("no such table") {
                    ValufeedError::new(ErrorCode::TableNotFound, msg.clone())
                } else {
                    ValufeedError::new(ErrorCode::QueryFailed, msg.clone())
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                ValufeedError::new(ErrorCode::QueryFailed, "Query returned no rows")
            }
            _ => ValufeedError::new(ErrorCode::QueryFailed, err.to_string()),
        }
    }
}

impl From<config::ConfigError> for ValufeedError {
    fn from(err: config::ConfigError) -> Self {
        ValufeedError::new(ErrorCode::InvalidConfig, err.to_string()).with_context(
            ErrorContext::Config {
                file_path: None,
                field: None,
            },
        )
    }
}

impl From<serde_json::Error> for ValufeedError {
    fn from(err: serde_json::Error) -> Self {
        ValufeedError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<std::io::Error> for ValufeedError {
    fn from(err: std::io::Error) -> Self {
        ValufeedError::new(ErrorCode::Internal, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_column_maps_to_field_not_found() {
        let err = rusqlite::Error::SqlInputError {
            error: rusqlite::ffi::Error::new(1),
            msg: "no such column: peg".to_string(),
            sql: "SELECT peg FROM valuations".to_string(),
            offset: 7,
        };
        let vf: ValufeedError = err.into();
        assert_eq!(vf.code, ErrorCode::FieldNotFound);
        assert!(vf.message.contains("peg"));
        assert!(vf.hint.is_some());
    }

    #[test]
    fn test_no_such_table_maps_to_table_not_found() {
        let err = rusqlite::Error::SqlInputError {
            error: rusqlite::ffi::Error::new(1),
            msg: "no such table: missing".to_string(),
            sql: "SELECT 1 FROM missing".to_string(),
            offset: 14,
        };
        let vf: ValufeedError = err.into();
        assert_eq!(vf.code, ErrorCode::TableNotFound);
    }

    #[test]
    fn test_config_error_mapping() {
        let err = config::ConfigError::Message("bad key".to_string());
        let vf: ValufeedError = err.into();
        assert_eq!(vf.code, ErrorCode::InvalidConfig);
        assert!(vf.message.contains("bad key"));
    }
}
