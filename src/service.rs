//! Session service: the single source of truth for authentication state.
//!
//! All state transitions (login, validate, logout, profile update) start
//! here. Query operations are pure reads delegating to the credential store
//! and never touch the network. Network failures are translated to
//! user-facing text via the notifier and propagated typed; persistence
//! failures are logged and swallowed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError, ProfilePatch, ValidatedUser};
use crate::auth::{CredentialStore, SessionRecord};
use crate::hooks::Notifier;

pub struct SessionService {
    store: Arc<CredentialStore>,
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl SessionService {
    pub fn new(store: Arc<CredentialStore>, api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            api,
            notifier,
        }
    }

    // ===== State transitions =====

    /// Anonymous -> Authenticated. On success the record is persisted and
    /// returned; on failure nothing changes and the error is surfaced.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionRecord, ApiError> {
        match self.api.login(email, password).await {
            Ok(data) => {
                let record = SessionRecord::from_login(&data, Utc::now());
                if let Err(e) = self.store.save(&record) {
                    warn!(error = %e, "Failed to persist session");
                }
                info!(user_id = record.id, "Login successful");
                self.notifier.success("Signed in.");
                Ok(record)
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }

    /// Authenticated -> AuthenticatedComplete. Replaces the stored record
    /// with the extended one, preserving token, tokenType, and expiresAt.
    ///
    /// A `valid: false` answer rejects the validation but leaves the stored
    /// record untouched; only a 401 (handled in the interceptor) invalidates.
    /// `return_to` is the application location to come back to after a
    /// forced re-login.
    pub async fn validate_token(&self, return_to: &str) -> Result<SessionRecord, ApiError> {
        let Some(current) = self.store.get() else {
            return Err(ApiError::Unauthorized);
        };

        match self.api.validate(return_to).await {
            Ok(data) if data.valid => {
                let user = data.user.ok_or_else(|| {
                    ApiError::InvalidResponse("validate: valid response without user".to_string())
                })?;
                let record = current.with_profile(&user);
                if let Err(e) = self.store.save(&record) {
                    warn!(error = %e, "Failed to persist validated session");
                }
                info!(user_id = record.id, "Session validated");
                Ok(record)
            }
            Ok(_) => {
                let e = ApiError::ValidationRejected;
                warn!("Validation endpoint rejected the session");
                self.notifier.error(&e.user_message());
                Err(e)
            }
            Err(e) => {
                // On 401 the interceptor has already cleared the store
                error!(error = %e, "Validation request failed");
                self.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }

    /// Any state -> Anonymous. Always succeeds; clearing an absent record
    /// is a no-op.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
        info!("Logged out");
    }

    /// Patch profile fields remotely, then patch only the denormalized
    /// display names in the stored record. Authentication state is
    /// unchanged; last writer wins.
    pub async fn update_profile(
        &self,
        patch: &ProfilePatch,
        return_to: &str,
    ) -> Result<ValidatedUser, ApiError> {
        match self.api.update_profile(patch, return_to).await {
            Ok(user) => {
                if let Some(mut record) = self.store.get() {
                    record.update_name(&user.first_name, &user.first_last_name);
                    if let Err(e) = self.store.save(&record) {
                        warn!(error = %e, "Failed to persist profile patch");
                    }
                }
                info!(user_id = user.id, "Profile updated");
                self.notifier.success("Profile updated.");
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Profile update failed");
                self.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }

    // ===== Queries (pure reads, no network, no transitions) =====

    pub fn current_user(&self) -> Option<SessionRecord> {
        self.store.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    pub fn is_token_expired(&self) -> bool {
        self.store.is_expired()
    }

    pub fn time_remaining_secs(&self) -> i64 {
        self.store.time_remaining_secs()
    }
}
