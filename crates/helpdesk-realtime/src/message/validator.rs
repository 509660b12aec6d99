//! Message and identifier validation rules.

use helpdesk_core::error::AppError;

use crate::error::FrameError;

/// Maximum length of a caller-supplied user or room id.
const MAX_IDENTIFIER_LEN: usize = 128;

/// Validates raw inbound bytes before decoding.
pub fn validate_inbound(raw: &[u8], max_bytes: usize) -> Result<(), FrameError> {
    if raw.len() > max_bytes {
        return Err(FrameError::TooLarge { max: max_bytes });
    }

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(FrameError::Empty);
    }

    Ok(())
}

/// Validates a user or room id supplied by a client.
pub fn validate_identifier(label: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() || value.len() > MAX_IDENTIFIER_LEN {
        return Err(AppError::validation(format!("Invalid {label} length")));
    }

    if value.chars().any(char::is_control) {
        return Err(AppError::validation(format!(
            "{label} contains invalid characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("room_id", "support-1").is_ok());
        assert!(validate_identifier("room_id", "").is_err());
        assert!(validate_identifier("user_id", &"u".repeat(129)).is_err());
        assert!(validate_identifier("user_id", "bad\nid").is_err());
    }
}
