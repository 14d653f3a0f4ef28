//! Identifier validation for the pieces of a query that cannot be bound
//! as parameters: the metric field chosen by the caller and the configured
//! table name.

use valufeed_error::{ErrorCode, Result, ValufeedError};

pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name.len() > 128 {
        return Err(invalid(&format!("too long: {}", name.len())));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap_or('_');
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid(name));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(name));
    }
    Ok(())
}

fn invalid(detail: &str) -> ValufeedError {
    ValufeedError::new(
        ErrorCode::InvalidIdentifier,
        format!("forbidden characters in identifier: {}", detail),
    )
    .with_hint("Identifiers must match [A-Za-z_][A-Za-z0-9_]*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("pe").is_ok());
        assert!(validate_identifier("company_name").is_ok());
        assert!(validate_identifier("_internal").is_ok());
        assert!(validate_identifier("ev2ebitda").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("pe ratio").is_err());
        assert!(validate_identifier("pe; DROP TABLE valuations").is_err());
        assert!(validate_identifier("pe\"").is_err());
        assert!(validate_identifier("null\0byte").is_err());
    }

    #[test]
    fn test_length_limit() {
        let long = "a".repeat(129);
        assert!(validate_identifier(&long).is_err());
        let ok = "a".repeat(128);
        assert!(validate_identifier(&ok).is_ok());
    }
}
