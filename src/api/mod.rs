//! REST API client module for the Casework backend.
//!
//! This module provides the `ApiClient` for the authentication endpoints
//! (login, token validation, profile update) plus the `ApiError` taxonomy
//! every network failure in the crate maps into.
//!
//! The API uses JWT bearer token authentication; tokens are attached by the
//! request interceptor, never by individual call sites.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginData, LoginUser, ProfilePatch, ValidatedUser};
pub use error::ApiError;
