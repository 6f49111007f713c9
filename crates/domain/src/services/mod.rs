//! Domain services for the Menu Builder.
//!
//! Services contain business logic that operates on domain models.

pub mod design_resolution;
pub mod design_versions;
pub mod expiry;

pub use design_resolution::{resolve_design, resolve_display_design, DesignSource, ResolvedDesign};

pub use design_versions::{
    auto_version_name, create_version, delete_version, get_version, link_design_to_qr,
    list_versions, save_and_publish, set_active_version, unlink_design_from_qr, update_version,
    BusinessDesignStore, DesignVersionStore, QrPointerUpdate, SaveOutcome,
};

pub use expiry::{effective_status, is_expired, TrialWindow, MINUTES_PER_DAY};
