//! Common validation rules shared across request payloads.

use validator::ValidationError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const MAX_NAME_LENGTH: usize = 100;

/// Collapses runs of whitespace into single spaces and trims both ends.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validates a holiday name after normalisation.
///
/// Requirements:
/// - Not blank
/// - At most 100 characters
pub fn validate_holiday_name(name: &str) -> Result<(), ValidationError> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Err(ValidationError::new("name_required"));
    }
    if normalized.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::new("name_too_long"));
    }
    Ok(())
}

/// Validates the extension of an uploaded holiday image key.
///
/// Accepts `.jpg`, `.jpeg` and `.png`, case-insensitive.
pub fn validate_image_key(image_key: &str) -> Result<(), ValidationError> {
    let extension = image_key
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_ascii_lowercase()))
        .filter(|(stem, _)| !stem.is_empty() && !stem.ends_with('/'))
        .map(|(_, ext)| ext);

    match extension {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::new("image_extension_invalid")),
    }
}
