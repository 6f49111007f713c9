//! Common validation utilities.

use base64::{engine::general_purpose::STANDARD, Engine};
use validator::{ValidateUrl, ValidationError};

/// Minimum slug length.
pub const MIN_SLUG_LENGTH: usize = 3;

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 60;

/// Default maximum decoded size of an embedded image (2 MiB).
pub const DEFAULT_MAX_EMBEDDED_IMAGE_BYTES: usize = 2 * 1024 * 1024;

lazy_static::lazy_static! {
    static ref SLUG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    static ref DATA_URI_REGEX: regex::Regex =
        regex::Regex::new(r"^data:image/[a-zA-Z0-9.+-]+;base64,").unwrap();
}

/// Validates a public slug: lowercase alphanumeric with single hyphens,
/// no leading/trailing hyphen.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() < MIN_SLUG_LENGTH || slug.len() > MAX_SLUG_LENGTH {
        let mut err = ValidationError::new("slug_length");
        err.message = Some(
            format!(
                "Slug must be {}-{} characters",
                MIN_SLUG_LENGTH, MAX_SLUG_LENGTH
            )
            .into(),
        );
        return Err(err);
    }

    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message = Some(
            "Slug must be lowercase alphanumeric with hyphens, no leading/trailing hyphens".into(),
        );
        Err(err)
    }
}

/// Derives a slug from a display name.
///
/// Non-alphanumeric runs collapse into a single hyphen. Accented Latin
/// letters are not transliterated; they are treated as separators.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Validates a URL on a partial update, where a blank value clears the field.
pub fn validate_url_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_url() {
        Ok(())
    } else {
        let mut err = ValidationError::new("url");
        err.message = Some("Must be a valid URL".into());
        Err(err)
    }
}

/// Maps an optional text field of a partial update: absent leaves the stored
/// value, blank clears it.
pub fn clearable(value: &Option<String>) -> Option<Option<&str>> {
    value.as_deref().map(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(v)
        }
    })
}

/// Returns true if the value is an inline `data:` URI rather than a URL.
pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

/// Validates an embedded image data URI.
///
/// Must be `data:image/<type>;base64,<payload>` with a decodable payload no
/// larger than `max_bytes` once decoded.
pub fn validate_data_uri_image(value: &str, max_bytes: usize) -> Result<(), ValidationError> {
    let Some(prefix) = DATA_URI_REGEX.find(value) else {
        let mut err = ValidationError::new("data_uri_format");
        err.message = Some("Embedded images must be base64 data:image URIs".into());
        return Err(err);
    };

    let payload = &value[prefix.end()..];

    // Cheap upper bound before decoding
    if payload.len() / 4 * 3 > max_bytes + 3 {
        return Err(too_large(max_bytes));
    }

    let decoded = STANDARD.decode(payload).map_err(|_| {
        let mut err = ValidationError::new("data_uri_encoding");
        err.message = Some("Embedded image is not valid base64".into());
        err
    })?;

    if decoded.len() > max_bytes {
        return Err(too_large(max_bytes));
    }

    Ok(())
}

fn too_large(max_bytes: usize) -> ValidationError {
    let mut err = ValidationError::new("data_uri_size");
    err.message = Some(format!("Embedded image exceeds {} bytes", max_bytes).into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("cafe-luna").is_ok());
        assert!(validate_slug("bistro42").is_ok());
        assert!(validate_slug("a-b-c").is_ok());
    }

    #[test]
    fn test_validate_slug_rejects_bad_format() {
        assert!(validate_slug("Cafe-Luna").is_err());
        assert!(validate_slug("-cafe").is_err());
        assert!(validate_slug("cafe-").is_err());
        assert!(validate_slug("cafe--luna").is_err());
        assert!(validate_slug("cafe luna").is_err());
    }

    #[test]
    fn test_validate_slug_length() {
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug(&"a".repeat(61)).is_err());
        assert!(validate_slug(&"a".repeat(60)).is_ok());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Café Luna"), "caf-luna");
        assert_eq!(slugify("  Joe's   Diner!! "), "joe-s-diner");
        assert_eq!(slugify("Pizza 4 You"), "pizza-4-you");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_truncates() {
        let slug = slugify(&"word ".repeat(30));
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
        assert!(validate_slug(&slug).is_ok());
    }

    #[test]
    fn test_is_data_uri() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(!is_data_uri("https://cdn.example.com/logo.png"));
    }

    #[test]
    fn test_validate_data_uri_image() {
        let payload = STANDARD.encode([0u8; 64]);
        let uri = format!("data:image/png;base64,{}", payload);
        assert!(validate_data_uri_image(&uri, 1024).is_ok());
        assert!(validate_data_uri_image(&uri, 32).is_err());
    }

    #[test]
    fn test_validate_data_uri_image_format() {
        assert!(validate_data_uri_image("data:text/plain;base64,AAAA", 1024).is_err());
        assert!(validate_data_uri_image("data:image/png,raw", 1024).is_err());
        assert!(validate_data_uri_image("data:image/png;base64,!!!", 1024).is_err());
        assert!(validate_data_uri_image("data:image/svg+xml;base64,PHN2Zz4=", 1024).is_ok());
    }

    #[test]
    fn test_validate_url_or_blank() {
        assert!(validate_url_or_blank("").is_ok());
        assert!(validate_url_or_blank("  ").is_ok());
        assert!(validate_url_or_blank("https://cdn.example.com/logo.png").is_ok());
        assert!(validate_url_or_blank("not a url").is_err());
    }

    #[test]
    fn test_clearable() {
        assert_eq!(clearable(&None), None);
        assert_eq!(clearable(&Some("  ".to_string())), Some(None));
        assert_eq!(clearable(&Some("Main St 1".to_string())), Some(Some("Main St 1")));
    }
}
