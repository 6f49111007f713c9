//! HTTP route handlers.

pub mod admin;
pub mod business;
pub mod design_versions;
pub mod health;
pub mod menu;
pub mod public;
