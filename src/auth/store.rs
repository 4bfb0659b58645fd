//! Single-slot persistence for the session record.
//!
//! The store owns the one persisted `SessionRecord`: a JSON file at a fixed
//! path. Persistence failures never reach the UI. Writes return a
//! `StoreError` that callers log and swallow, and a missing or corrupt file
//! on read degrades to "no session".

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::SessionRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store holding at most one session record.
/// All operations hit the file; there is no in-memory copy to drift.
/// Concurrent writers are last-writer-wins, no version check.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist the record, overwriting any prior one.
    pub fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Read the stored record. Absence, an unreadable file, or a parse
    /// failure all yield `None`, never an error.
    pub fn get(&self) -> Option<SessionRecord> {
        if !self.path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to read session file, treating as no session");
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&contents) {
            Ok(mut record) => {
                // A record saved without profile fields round-trips through
                // the flattened layout as an all-empty profile
                if record.profile.as_ref().is_some_and(|p| p.is_empty()) {
                    record.profile = None;
                }
                Some(record)
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse session file, treating as no session");
                None
            }
        }
    }

    /// The stored bearer token, if a session exists (expired or not).
    pub fn token(&self) -> Option<String> {
        self.get().map(|record| record.token)
    }

    /// True when no session exists or the current time is at or past expiry.
    pub fn is_expired(&self) -> bool {
        match self.get() {
            Some(record) => record.is_expired(Utc::now()),
            None => true,
        }
    }

    /// True iff a token exists and it is not expired.
    pub fn is_authenticated(&self) -> bool {
        self.get()
            .map(|record| !record.is_expired(Utc::now()))
            .unwrap_or(false)
    }

    /// Seconds until expiry, zero when there is no session or it has expired.
    pub fn time_remaining_secs(&self) -> i64 {
        self.get()
            .map(|record| record.time_remaining_secs(Utc::now()))
            .unwrap_or(0)
    }

    /// Remove the stored record. Idempotent.
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            debug!("Cleared stored session");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn temp_store(name: &str) -> CredentialStore {
        let path = std::env::temp_dir().join(format!(
            "casework-client-store-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        CredentialStore::new(path)
    }

    fn sample_record(expires_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            id: 7,
            first_name: "Maria".to_string(),
            first_last_name: "Gomez".to_string(),
            email: "maria@example.com".to_string(),
            token: "tok-abc123".to_string(),
            token_type: "Bearer".to_string(),
            expires_at,
            profile: None,
        }
    }

    #[test]
    fn test_save_get_round_trip() {
        let store = temp_store("round-trip");
        let record = sample_record(Utc::now() + Duration::seconds(3600));

        store.save(&record).unwrap();
        let loaded = store.get().expect("stored record should load");

        assert_eq!(loaded.token, record.token);
        assert_eq!(loaded.token_type, record.token_type);
        assert_eq!(loaded.expires_at, record.expires_at);

        let _ = store.clear();
    }

    #[test]
    fn test_get_absent_when_nothing_stored() {
        let store = temp_store("absent");
        assert!(store.get().is_none());
        assert!(store.token().is_none());
        assert!(store.is_expired());
        assert!(!store.is_authenticated());
        assert_eq!(store.time_remaining_secs(), 0);
    }

    #[test]
    fn test_corrupt_file_degrades_to_no_session() {
        let store = temp_store("corrupt");
        if let Some(parent) = store.path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&store.path, "{not valid json").unwrap();

        assert!(store.get().is_none());
        assert!(!store.is_authenticated());

        let _ = store.clear();
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = temp_store("idempotent-clear");
        store
            .save(&sample_record(Utc::now() + Duration::seconds(60)))
            .unwrap();

        store.clear().unwrap();
        assert!(store.get().is_none());
        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_expired_record_has_token_but_not_authenticated() {
        let store = temp_store("expired");
        store
            .save(&sample_record(Utc::now() - Duration::seconds(60)))
            .unwrap();

        assert!(store.token().is_some());
        assert!(store.is_expired());
        assert!(!store.is_authenticated());
        assert_eq!(store.time_remaining_secs(), 0);

        let _ = store.clear();
    }

    #[test]
    fn test_auth_state_consistency() {
        let store = temp_store("consistency");

        // No session
        assert_eq!(
            store.is_authenticated(),
            store.token().is_some() && !store.is_expired()
        );

        // Live session
        store
            .save(&sample_record(Utc::now() + Duration::seconds(3600)))
            .unwrap();
        assert_eq!(
            store.is_authenticated(),
            store.token().is_some() && !store.is_expired()
        );

        // Expired session
        store
            .save(&sample_record(Utc::now() - Duration::seconds(1)))
            .unwrap();
        assert_eq!(
            store.is_authenticated(),
            store.token().is_some() && !store.is_expired()
        );

        let _ = store.clear();
    }

    #[test]
    fn test_save_overwrites_last_writer_wins() {
        let store = temp_store("overwrite");
        let expires_at = Utc::now() + Duration::seconds(3600);

        let mut first = sample_record(expires_at);
        first.first_name = "Maria".to_string();
        store.save(&first).unwrap();

        let mut second = sample_record(expires_at);
        second.first_name = "Ana".to_string();
        store.save(&second).unwrap();

        let loaded = store.get().unwrap();
        assert_eq!(loaded.first_name, "Ana");
        assert_eq!(loaded.token, first.token);
        assert_eq!(loaded.expires_at, expires_at);

        let _ = store.clear();
    }
}
