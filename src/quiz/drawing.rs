//! Canvas answers arrive as image data URIs (`data:image/png;base64,...`).

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::QuizError;

/// Check that `uri` is a base64 image data URI with a non-empty payload.
/// Returns the image subtype (e.g. "png").
pub fn validate_data_uri(uri: &str) -> Result<&str, QuizError> {
    let rest = uri
        .trim()
        .strip_prefix("data:image/")
        .ok_or(QuizError::InvalidDrawing)?;
    let (subtype, payload) = rest
        .split_once(";base64,")
        .ok_or(QuizError::InvalidDrawing)?;

    let subtype_ok = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');
    if !subtype_ok || payload.is_empty() {
        return Err(QuizError::InvalidDrawing);
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| QuizError::InvalidDrawing)?;
    if bytes.is_empty() {
        return Err(QuizError::InvalidDrawing);
    }

    Ok(subtype)
}

// 1x1 transparent PNG
#[cfg(test)]
pub(crate) const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";
