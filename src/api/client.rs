//! HTTP client for the Casework authentication endpoints.
//!
//! Response bodies arrive wrapped in a `{data: ...}` envelope and are
//! decoded into explicit tagged types at this boundary; a shape that does
//! not decode fails closed as `ApiError::InvalidResponse`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::api::ApiError;
use crate::config::Config;
use crate::interceptor::RequestInterceptor;

const LOGIN_PATH: &str = "/auth/login";
const VALIDATE_PATH: &str = "/auth/validate";
const PROFILE_PATH: &str = "/auth/profile";

/// Backend envelope wrapping every response payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: LoginUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i64,
    pub first_name: String,
    pub first_last_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateData {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<ValidatedUser>,
}

/// Full profile returned by the validation and profile-update endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub second_name: Option<String>,
    pub first_last_name: String,
    #[serde(default)]
    pub second_last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub document_type_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial profile update. Only fields set to `Some` are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// API client for the Casework backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    interceptor: RequestInterceptor,
}

impl ApiClient {
    pub fn new(config: &Config, interceptor: RequestInterceptor) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interceptor,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decode<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, ApiError> {
        serde_json::from_str::<Envelope<T>>(text)
            .map(|envelope| envelope.data)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
    }

    /// Exchange credentials for a session. The one request sent without a
    /// bearer token; its 401 means bad credentials, not a dead session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await?;
        debug!("Login response received");
        Self::decode(LOGIN_PATH, &text)
    }

    /// Ask the backend whether the stored token is still good and fetch the
    /// full profile. Goes through the interceptor, so a 401 invalidates and
    /// redirects to login carrying `return_to`, the application location the
    /// caller was at.
    pub async fn validate(&self, return_to: &str) -> Result<ValidateData, ApiError> {
        let response = self
            .interceptor
            .execute(self.client.post(self.url(VALIDATE_PATH)), return_to)
            .await?;

        let text = response.text().await?;
        debug!("Validate response received");
        Self::decode(VALIDATE_PATH, &text)
    }

    /// Patch profile fields, returning the updated profile. A 401 redirects
    /// to login carrying `return_to`.
    pub async fn update_profile(
        &self,
        patch: &ProfilePatch,
        return_to: &str,
    ) -> Result<ValidatedUser, ApiError> {
        let response = self
            .interceptor
            .execute(
                self.client.patch(self.url(PROFILE_PATH)).json(patch),
                return_to,
            )
            .await?;

        let text = response.text().await?;
        debug!("Profile update response received");
        Self::decode(PROFILE_PATH, &text)
    }
}
