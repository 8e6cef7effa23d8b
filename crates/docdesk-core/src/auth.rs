//! Session lifecycle: login, registration, logout and startup restore.
//!
//! The session is mirrored to [`KeyValueStore`] under three keys so a restart
//! comes back signed in. Nothing validates the token on restore; the first
//! authenticated request that fails with 401 is what signs the user out.

use crate::api::ApiClient;
use crate::error::{DocdeskError, Result};
use crate::model::*;
use crate::storage::{
    KeyValueStore, LocalStorage, AUTH_TOKEN_KEY, CURRENT_COMPANY_KEY, CURRENT_USER_KEY,
    SESSION_KEYS,
};

pub struct AuthService<S = LocalStorage> {
    api: ApiClient,
    store: S,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Exchange credentials for a session and persist it.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session> {
        let request = LoginRequest::new(email.trim(), password);
        request.validate()?;

        let session = self.api.login(&request).await?;
        self.persist(&session)?;
        tracing::info!(user = %session.user.email, company = %session.company.name, "signed in");
        Ok(session)
    }

    /// Create a company + user. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>> {
        request.validate()?;
        let message = self.api.register(request).await?;
        tracing::info!(company = %request.company_name, "registered");
        Ok(message)
    }

    /// Best-effort server logout, then clear every persisted key regardless
    /// of what the server said.
    pub async fn logout(&mut self, session: Option<&Session>) -> Result<()> {
        if let Some(session) = session {
            if let Err(e) = self.api.logout(session).await {
                tracing::debug!(error = %e, "server logout failed, clearing locally anyway");
            }
        }
        self.clear()
    }

    /// Remove all session keys. Attempts every key before reporting a failure.
    pub fn clear(&mut self) -> Result<()> {
        let mut first_err = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session key");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Read the persisted session. Partial or unreadable state counts as signed out.
    pub fn restore_session(&self) -> Option<Session> {
        let read = |key: &str| match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read session key");
                None
            }
        };

        let token = read(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let user_json = read(CURRENT_USER_KEY)?;
        let company_json = read(CURRENT_COMPANY_KEY)?;

        let user: User = serde_json::from_str(&user_json)
            .map_err(|e| tracing::warn!(error = %e, "stored user unreadable"))
            .ok()?;
        let company: Company = serde_json::from_str(&company_json)
            .map_err(|e| tracing::warn!(error = %e, "stored company unreadable"))
            .ok()?;

        Some(Session {
            user,
            company,
            token,
        })
    }

    /// Fetch the current profile and refresh the cached identity.
    pub async fn profile(&mut self, session: &Session) -> Result<Session> {
        let profile = self.api.me(session).await?;
        let refreshed = Session {
            user: profile.user,
            company: profile.company,
            token: session.token.clone(),
        };
        self.persist(&refreshed)?;
        Ok(refreshed)
    }

    fn persist(&mut self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        let company = serde_json::to_string(&session.company)?;
        self.store.set(AUTH_TOKEN_KEY, &session.token)?;
        self.store.set(CURRENT_USER_KEY, &user)?;
        self.store.set(CURRENT_COMPANY_KEY, &company)?;
        Ok(())
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

/// Returns the session or `NotSignedIn`.
pub fn require(session: Option<&Session>) -> Result<&Session> {
    session.ok_or(DocdeskError::NotSignedIn)
}
