//! Domain layer for the Menu Builder backend.
//!
//! This crate contains:
//! - Domain models (DesignDocument, DesignVersion, Business, Menu, Profile)
//! - Design resolution, version lifecycle and expiry services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
