//! Domain models for the Menu Builder.

pub mod business;
pub mod design;
pub mod design_version;
pub mod menu;
pub mod profile;
pub mod public_menu;

pub use business::{
    AdminBusinessSummary, Business, BusinessResponse, BusinessStatus, CreateBusinessRequest,
    ListBusinessesQuery, ListBusinessesResponse, NewBusiness, PublicBusinessProfile,
    SaveDesignRequest, SetBusinessStatusRequest, TimeWindowRequest, UpdateBusinessRequest,
};
pub use design::{DesignDocument, Item, Layout, Section};
pub use design_version::{
    CreateDesignVersionRequest, DesignVersion, DesignVersionChanges, DesignVersionSummary,
    LinkQrDesignRequest, ListDesignVersionsResponse, NewDesignVersion,
    UpdateDesignVersionRequest,
};
pub use menu::{
    Category, CategoryWithItems, CreateCategoryRequest, CreateMenuItemRequest, MenuItem,
    UpdateCategoryRequest, UpdateMenuItemRequest,
};
pub use profile::{Profile, UserRole};
pub use public_menu::PublicMenuResponse;
