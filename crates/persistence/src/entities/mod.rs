//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod business;
pub mod category;
pub mod design_version;
pub mod menu_item;
pub mod profile;

pub use business::{AdminBusinessSummaryEntity, BusinessEntity, BusinessStatusDb};
pub use category::CategoryEntity;
pub use design_version::{DesignVersionEntity, DesignVersionSummaryEntity};
pub use menu_item::MenuItemEntity;
pub use profile::{ProfileEntity, UserRoleDb};
