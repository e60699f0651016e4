use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::identity::errors::SessionError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::RefreshRecord;
use crate::domain::identity::models::ResetRequest;
use crate::domain::identity::models::RevocationEntry;
use crate::domain::identity::ports::CredentialStore;

#[derive(Debug, Default)]
struct InnerState {
    identities: HashMap<String, Identity>,
    reset_requests: HashMap<String, ResetRequest>,
    refresh_records: HashMap<String, RefreshRecord>,
    revocations: HashSet<(String, String)>,
}

/// Credential store held in process memory behind a Tokio mutex.
///
/// Used when no database is configured and by the integration tests.
/// Deleting an identity also drops its reset request and refresh record,
/// matching the cascading foreign keys of the Postgres schema.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    state: Arc<Mutex<InnerState>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reset_request_count(&self) -> usize {
        self.state.lock().await.reset_requests.len()
    }

    pub async fn refresh_record_count(&self) -> usize {
        self.state.lock().await.refresh_records.len()
    }

    pub async fn revocation_count(&self) -> usize {
        self.state.lock().await.revocations.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_identity(&self, identity: Identity) -> Result<Identity, SessionError> {
        let mut state = self.state.lock().await;
        let key = identity.email.as_str().to_string();

        if state.identities.contains_key(&key) {
            return Err(SessionError::AlreadyExists(key));
        }

        state.identities.insert(key, identity.clone());
        Ok(identity)
    }

    async fn find_identity(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, SessionError> {
        Ok(self.state.lock().await.identities.get(email.as_str()).cloned())
    }

    async fn update_identity(&self, identity: Identity) -> Result<Identity, SessionError> {
        let mut state = self.state.lock().await;

        match state.identities.get_mut(identity.email.as_str()) {
            Some(stored) => {
                *stored = identity.clone();
                Ok(identity)
            }
            None => Err(SessionError::NotFound(identity.email.to_string())),
        }
    }

    async fn delete_identity(&self, email: &EmailAddress) -> Result<bool, SessionError> {
        let mut state = self.state.lock().await;

        state.reset_requests.remove(email.as_str());
        state.refresh_records.remove(email.as_str());
        Ok(state.identities.remove(email.as_str()).is_some())
    }

    async fn save_reset_request(&self, request: ResetRequest) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state
            .reset_requests
            .insert(request.email.as_str().to_string(), request);
        Ok(())
    }

    async fn find_reset_request(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<ResetRequest>, SessionError> {
        Ok(self
            .state
            .lock()
            .await
            .reset_requests
            .get(email.as_str())
            .cloned())
    }

    async fn delete_reset_request(&self, email: &EmailAddress) -> Result<(), SessionError> {
        self.state
            .lock()
            .await
            .reset_requests
            .remove(email.as_str());
        Ok(())
    }

    async fn save_refresh_record(&self, record: RefreshRecord) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state
            .refresh_records
            .insert(record.email.as_str().to_string(), record);
        Ok(())
    }

    async fn consume_refresh_record(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<bool, SessionError> {
        let mut state = self.state.lock().await;

        match state.refresh_records.get(email.as_str()) {
            Some(record) if record.token == token => {
                state.refresh_records.remove(email.as_str());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_refresh_record(&self, email: &EmailAddress) -> Result<(), SessionError> {
        self.state
            .lock()
            .await
            .refresh_records
            .remove(email.as_str());
        Ok(())
    }

    async fn revoke(&self, entry: RevocationEntry) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state
            .revocations
            .insert((entry.email.as_str().to_string(), entry.token));
        Ok(())
    }

    async fn is_revoked(&self, email: &EmailAddress, token: &str) -> Result<bool, SessionError> {
        let state = self.state.lock().await;
        Ok(state
            .revocations
            .contains(&(email.as_str().to_string(), token.to_string())))
    }
}
