use clinicavet_common::{DomainError, DomainResult};

pub(crate) fn required(
    value: &str,
    max_chars: usize,
    missing: &str,
    too_long: &str,
) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(missing));
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::validation(too_long));
    }
    Ok(trimmed.to_string())
}

/// Blank input collapses to `None`.
pub(crate) fn optional(
    value: Option<String>,
    max_chars: usize,
    too_long: &str,
) -> DomainResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::validation(too_long));
    }
    Ok(Some(trimmed.to_string()))
}

pub(crate) fn free_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
