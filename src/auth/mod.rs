//! Session records and their persistence.
//!
//! This module provides:
//! - `SessionRecord` / `ProfileDetails`: the persisted session shape
//! - `CredentialStore`: single-slot JSON persistence with defensive parsing
//!
//! A session is either entirely absent or fully populated; no partially
//! initialized state is visible to consumers.

pub mod session;
pub mod store;

pub use session::{ProfileDetails, SessionRecord};
pub use store::{CredentialStore, StoreError};
