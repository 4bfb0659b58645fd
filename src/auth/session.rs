//! Session record types and expiry arithmetic.
//!
//! A `SessionRecord` is the minimal authenticated-identity + credential
//! bundle persisted client-side. Validation replaces it with an extended
//! record carrying the full profile (`profile: Some`), never touching the
//! credential itself.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{LoginData, ValidatedUser};

/// The persisted session: identity, credential, and absolute expiry.
///
/// Serialized flat as `{id, firstName, firstLastName, email, token,
/// tokenType, expiresAt, ...profile fields}`. `expiresAt` is an ISO-8601
/// string on disk and reconstructed to a timestamp on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: i64,
    pub first_name: String,
    pub first_last_name: String,
    pub email: String,
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Option<ProfileDetails>,
}

/// Extra identity fields returned by the validation endpoint.
/// Present only on a validated (extended) record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProfileDetails {
    /// True when every field is absent. A flattened `Option<ProfileDetails>`
    /// deserializes to `Some` even when no profile fields were stored, so
    /// readers normalize an all-empty profile back to `None`.
    pub fn is_empty(&self) -> bool {
        self.second_name.is_none()
            && self.second_last_name.is_none()
            && self.phone_number.is_none()
            && self.position.is_none()
            && self.organization.is_none()
            && self.document_number.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.birth_date.is_none()
            && self.document_type_id.is_none()
            && self.status.is_none()
            && self.created_at.is_none()
            && self.updated_at.is_none()
    }
}

impl SessionRecord {
    /// Build a session record from a successful login response.
    /// `expires_at` is absolute: `issued_at + expires_in` seconds.
    pub fn from_login(data: &LoginData, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: data.user.id,
            first_name: data.user.first_name.clone(),
            first_last_name: data.user.first_last_name.clone(),
            email: data.user.email.clone(),
            token: data.access_token.clone(),
            token_type: data.token_type.clone(),
            expires_at: issued_at + Duration::seconds(data.expires_in),
            profile: None,
        }
    }

    /// Build the extended record from a validated user, preserving the
    /// credential (`token`, `token_type`, `expires_at`) of this record.
    pub fn with_profile(&self, user: &ValidatedUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            first_last_name: user.first_last_name.clone(),
            email: user.email.clone(),
            token: self.token.clone(),
            token_type: self.token_type.clone(),
            expires_at: self.expires_at,
            profile: Some(ProfileDetails {
                second_name: user.second_name.clone(),
                second_last_name: user.second_last_name.clone(),
                phone_number: user.phone_number.clone(),
                position: user.position.clone(),
                organization: user.organization.clone(),
                document_number: user.document_number.clone(),
                address: user.address.clone(),
                city: user.city.clone(),
                birth_date: user.birth_date.clone(),
                document_type_id: user.document_type_id,
                status: user.status.clone(),
                created_at: user.created_at.clone(),
                updated_at: user.updated_at.clone(),
            }),
        }
    }

    /// Expiry is a closed interval: a record is expired at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whole seconds until expiry, clamped to zero.
    pub fn time_remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// Patch the denormalized display fields after a profile update.
    /// Token and expiry are untouched.
    pub fn update_name(&mut self, first_name: &str, first_last_name: &str) {
        self.first_name = first_name.to_string();
        self.first_last_name = first_last_name.to_string();
    }
}
