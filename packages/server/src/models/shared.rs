use crate::error::AppError;

/// Validate a trimmed display name (1-256 Unicode characters).
pub fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
