//! Menu catalogue domain models (categories and items).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Non-negative decimal amount with at most two fractional digits
lazy_static::lazy_static! {
    pub static ref PRICE_REGEX: regex::Regex =
        regex::Regex::new(r"^\d{1,8}(\.\d{1,2})?$").unwrap();
}

fn validate_price_or_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() || PRICE_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("price");
        err.message =
            Some("Price must be a non-negative amount with up to 2 decimals".into());
        Err(err)
    }
}

/// Menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Menu item belonging to a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price formatted with two fractional digits.
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with its items, ordered for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryWithItems {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<MenuItem>,
}

impl CategoryWithItems {
    /// Groups items under their categories, keeping the incoming order of both.
    pub fn group(categories: Vec<Category>, items: Vec<MenuItem>) -> Vec<Self> {
        let mut grouped: Vec<Self> = categories
            .into_iter()
            .map(|category| Self {
                category,
                items: Vec::new(),
            })
            .collect();

        for item in items {
            if let Some(entry) = grouped
                .iter_mut()
                .find(|c| c.category.id == item.category_id)
            {
                entry.items.push(item);
            }
        }

        grouped
    }

    /// Drops unavailable items, as shown to diners.
    pub fn only_available(mut self) -> Self {
        self.items.retain(|i| i.is_available);
        self
    }
}

/// POST request to create a category.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub position: Option<i32>,
}

/// PUT request to update a category (partial).
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub position: Option<i32>,
}

/// POST request to create a menu item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(regex(path = "*PRICE_REGEX", message = "Price must be a non-negative amount with up to 2 decimals"))]
    pub price: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub position: Option<i32>,
}

/// PUT request to update a menu item (partial). A blank description,
/// price or image URL clears the field.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price_or_blank"))]
    pub price: Option<String>,
    #[validate(custom(function = "shared::validation::validate_url_or_blank"))]
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub position: Option<i32>,
    /// Moves the item to another category of the same business.
    pub category_id: Option<Uuid>,
}
