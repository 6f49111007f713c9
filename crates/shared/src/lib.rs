//! Shared utilities and common types for the Menu Builder backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Verification of access tokens issued by the hosted auth provider
//! - Slug and embedded image (data URI) validation

pub mod jwt;
pub mod validation;
