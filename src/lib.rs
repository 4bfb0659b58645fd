//! Client library for the Casework case-management API.
//!
//! This crate implements the authenticated-session lifecycle every screen
//! of the Casework front-end depends on: token acquisition, persistence,
//! expiry tracking, validation, and automatic invalidation on 401.
//!
//! The pieces, leaves first:
//! - [`auth::CredentialStore`]: single-slot persistence of the session record
//! - [`service::SessionService`]: login/validate/logout/profile transitions
//! - [`interceptor::RequestInterceptor`]: bearer attachment and the 401 policy
//! - [`app::App`]: composition root owning one instance of each

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod hooks;
pub mod interceptor;
pub mod service;

pub use api::{ApiClient, ApiError, ProfilePatch};
pub use app::App;
pub use auth::{CredentialStore, ProfileDetails, SessionRecord, StoreError};
pub use config::Config;
pub use hooks::{Navigator, Notifier, NullNavigator, NullNotifier};
pub use interceptor::RequestInterceptor;
pub use service::SessionService;
