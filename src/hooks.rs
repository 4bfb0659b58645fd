//! Collaborator interfaces consumed by the session core.
//!
//! The core surfaces human-readable text through a `Notifier` and requests
//! navigation through a `Navigator`; both are owned by the embedding
//! application. The core never manages their display lifecycle.

use tracing::debug;

/// Router abstraction. On invalidation the core asks for a redirect to the
/// login view, carrying the originally-requested location so the user can
/// return there after re-authenticating.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self, return_to: &str);
}

/// Notification/toast presenter for user-facing success and error text.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// No-op navigator for headless embeddings and tests.
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn redirect_to_login(&self, return_to: &str) {
        debug!(return_to, "Redirect to login requested");
    }
}

/// No-op notifier for headless embeddings and tests.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, message: &str) {
        debug!(message, "Notification (success)");
    }

    fn error(&self, message: &str) {
        debug!(message, "Notification (error)");
    }
}
