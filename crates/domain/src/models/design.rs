//! Design Document: the JSON value describing a menu's look and feel.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum number of sections in one document.
pub const MAX_SECTIONS: usize = 50;

/// Maximum number of items in one section.
pub const MAX_ITEMS_PER_SECTION: usize = 200;

/// Menu layout style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
    Card,
    Modern,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Grid => write!(f, "grid"),
            Layout::List => write!(f, "list"),
            Layout::Card => write!(f, "card"),
            Layout::Modern => write!(f, "modern"),
        }
    }
}

/// A self-contained visual design for a menu.
///
/// Missing fields fall back to defaults so that documents saved by older
/// editors still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignDocument {
    #[validate(length(max = 200, message = "Header title must be at most 200 characters"))]
    pub header_title: String,
    /// CSS color or URL-like token
    #[validate(length(max = 500, message = "Background must be at most 500 characters"))]
    pub background: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[validate(length(max = 50, message = "Accent color must be at most 50 characters"))]
    pub accent_color: String,
    /// Embedded image data or URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[validate(length(max = 100, message = "Font family must be at most 100 characters"))]
    pub font_family: String,
    pub layout: Layout,
    #[validate(
        length(max = 50, message = "A design can have at most 50 sections"),
        nested
    )]
    pub sections: Vec<Section>,
}

/// A titled group of items within a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    #[validate(length(max = 200, message = "Section title must be at most 200 characters"))]
    pub title: String,
    #[validate(
        length(max = 200, message = "A section can have at most 200 items"),
        nested
    )]
    pub items: Vec<Item>,
}

/// A single entry of a design section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[validate(length(min = 1, max = 200, message = "Item name must be 1-200 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Price must be at most 50 characters"))]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DesignDocument {
    /// Parses a stored JSON value. Returns `None` for null or malformed values.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Serializes the document for storage.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Total number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Every embedded image reference in the document, in document order.
    fn image_refs(&self) -> impl Iterator<Item = &str> + '_ {
        self.logo
            .as_deref()
            .into_iter()
            .chain(self.background_image.as_deref())
            .chain(
                self.sections
                    .iter()
                    .flat_map(|s| s.items.iter().filter_map(|i| i.image.as_deref())),
            )
    }

    /// Validates structure plus any inline `data:` images against a size cap.
    pub fn validate_with_limits(&self, max_image_bytes: usize) -> Result<(), ValidationErrors> {
        self.validate()?;

        let mut errors = ValidationErrors::new();
        for image in self.image_refs() {
            if shared::validation::is_data_uri(image) {
                if let Err(e) = shared::validation::validate_data_uri_image(image, max_image_bytes)
                {
                    errors.add("images", e);
                }
            } else if image.len() > 2048 {
                let mut err = ValidationError::new("image_url_length");
                err.message = Some("Image URLs must be at most 2048 characters".into());
                errors.add("images", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
