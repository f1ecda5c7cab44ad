use crate::utils::error::{ConvertError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "tickets.json").is_ok());
        assert!(validate_path("output.path", "out/tickets.json").is_ok());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "bad\0name.json").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("columns.rules[0].keyword", "вопрос").is_ok());
        assert!(validate_non_empty_string("columns.rules[0].keyword", "   ").is_err());
        assert!(validate_non_empty_string("columns.rules[0].keyword", "").is_err());
    }
}
