//! Request interceptor: bearer attachment and the 401 policy.
//!
//! Every authenticated request goes through `execute`. Before dispatch the
//! stored token is attached as a bearer credential; expiry is not pre-checked
//! (the server decides). After the response, a 401 clears the credential
//! store and redirects to login. This is the only place in the crate that
//! triggers invalidation. Requests are never retried, queued, or replayed.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::auth::CredentialStore;
use crate::hooks::Navigator;

#[derive(Clone)]
pub struct RequestInterceptor {
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl RequestInterceptor {
    pub fn new(store: Arc<CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Attach the stored bearer token, if any. Expired tokens are attached
    /// as-is; the server is the authority on expiry.
    pub fn attach(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Apply the response policy for an authenticated request. On 401 the
    /// store is cleared and the navigator is told to return to `requested`
    /// after re-login. `clear` is idempotent; a concurrent logout can race
    /// this path and both still land on the same cleared state.
    pub fn observe(&self, status: StatusCode, requested: &str) -> Result<(), ApiError> {
        if status == StatusCode::UNAUTHORIZED {
            info!(requested, "401 received, invalidating session");
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear session after 401");
            }
            self.navigator.redirect_to_login(requested);
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }

    /// Send an authenticated request and map the outcome to the error
    /// taxonomy. `requested` is the application location the caller was at,
    /// threaded through so the user lands back there after re-login.
    pub async fn execute(
        &self,
        builder: RequestBuilder,
        requested: &str,
    ) -> Result<Response, ApiError> {
        let response = self.attach(builder).send().await?;
        let status = response.status();

        self.observe(status, requested)?;

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::{Duration, Utc};
    use reqwest::header;

    use crate::auth::SessionRecord;

    /// Records redirect requests for assertions.
    struct RecordingNavigator {
        redirects: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                redirects: Mutex::new(Vec::new()),
            })
        }
    }

    impl Navigator for RecordingNavigator {
        fn redirect_to_login(&self, return_to: &str) {
            self.redirects.lock().unwrap().push(return_to.to_string());
        }
    }

    fn temp_store(name: &str) -> Arc<CredentialStore> {
        let path = std::env::temp_dir().join(format!(
            "casework-client-interceptor-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Arc::new(CredentialStore::new(path))
    }

    fn sample_record() -> SessionRecord {
        SessionRecord {
            id: 7,
            first_name: "Maria".to_string(),
            first_last_name: "Gomez".to_string(),
            email: "maria@example.com".to_string(),
            token: "tok-abc123".to_string(),
            token_type: "Bearer".to_string(),
            expires_at: Utc::now() + Duration::seconds(3600),
            profile: None,
        }
    }

    #[test]
    fn test_attach_adds_bearer_header_when_token_stored() {
        let store = temp_store("attach");
        store.save(&sample_record()).unwrap();
        let interceptor = RequestInterceptor::new(store.clone(), RecordingNavigator::new());

        let client = reqwest::Client::new();
        let request = interceptor
            .attach(client.get("http://localhost/auth/validate"))
            .build()
            .unwrap();

        let auth = request
            .headers()
            .get(header::AUTHORIZATION)
            .expect("authorization header attached");
        assert_eq!(auth.to_str().unwrap(), "Bearer tok-abc123");

        let _ = store.clear();
    }

    #[test]
    fn test_attach_skips_header_without_session() {
        let store = temp_store("attach-none");
        let interceptor = RequestInterceptor::new(store, RecordingNavigator::new());

        let client = reqwest::Client::new();
        let request = interceptor
            .attach(client.get("http://localhost/cases"))
            .build()
            .unwrap();

        assert!(request.headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_attach_keeps_expired_token() {
        let store = temp_store("attach-expired");
        let mut record = sample_record();
        record.expires_at = Utc::now() - Duration::seconds(60);
        store.save(&record).unwrap();
        let interceptor = RequestInterceptor::new(store.clone(), RecordingNavigator::new());

        let client = reqwest::Client::new();
        let request = interceptor
            .attach(client.get("http://localhost/cases"))
            .build()
            .unwrap();

        // The interceptor does not pre-check expiry
        assert!(request.headers().get(header::AUTHORIZATION).is_some());

        let _ = store.clear();
    }

    #[test]
    fn test_observe_401_clears_store_and_redirects() {
        let store = temp_store("observe-401");
        store.save(&sample_record()).unwrap();
        let navigator = RecordingNavigator::new();
        let interceptor = RequestInterceptor::new(store.clone(), navigator.clone());

        let result = interceptor.observe(StatusCode::UNAUTHORIZED, "/cases/15");
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(store.get().is_none());
        assert_eq!(
            navigator.redirects.lock().unwrap().clone(),
            vec!["/cases/15".to_string()]
        );
    }

    #[test]
    fn test_observe_401_with_already_cleared_store() {
        // A logout racing the 401 path must not produce a double-clear error
        let store = temp_store("observe-401-cleared");
        let navigator = RecordingNavigator::new();
        let interceptor = RequestInterceptor::new(store.clone(), navigator.clone());

        let result = interceptor.observe(StatusCode::UNAUTHORIZED, "/cases/15");
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(store.get().is_none());
        assert_eq!(navigator.redirects.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_observe_passes_other_statuses_through() {
        let store = temp_store("observe-ok");
        store.save(&sample_record()).unwrap();
        let navigator = RecordingNavigator::new();
        let interceptor = RequestInterceptor::new(store.clone(), navigator.clone());

        assert!(interceptor.observe(StatusCode::OK, "/cases").is_ok());
        assert!(interceptor
            .observe(StatusCode::INTERNAL_SERVER_ERROR, "/cases")
            .is_ok());

        // Non-401 outcomes never invalidate
        assert!(store.get().is_some());
        assert!(navigator.redirects.lock().unwrap().is_empty());

        let _ = store.clear();
    }
}
