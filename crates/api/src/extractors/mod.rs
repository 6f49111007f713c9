//! Custom Axum extractors.

pub mod owned_business;
pub mod user_auth;

pub use owned_business::OwnedBusiness;
