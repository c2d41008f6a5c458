//! # API Shared
//!
//! Shared definitions for the EMIS APIs.
//!
//! Contains:
//! - Request and response bodies (`dto` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//! - Admin key checking, used by the REST API and usable by any other front end
//!
//! Nothing here depends on `emis-core`; front ends convert between these types and the core's.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{validate_api_key, AuthError};
pub use dto::*;
pub use health::HealthService;
