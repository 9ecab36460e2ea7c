//! Login and registration exchanges.
//!
//! The authenticator only validates credentials and returns an identity;
//! recording it locally is the session store's job.

use crate::{ApiClient, AuthError, AuthResult};
use chrono::{DateTime, Utc};
use eco_types::{LoginForm, LoginResponse, RegistrationForm, Session};
use serde::Deserialize;

const LOGIN_COLLECTION: &str = "Login";
const USER_COLLECTION: &str = "User";

/// Checks credentials against `POST {base}/ControllerLogin`.
#[derive(Clone)]
pub struct Authenticator {
    api: ApiClient,
}

impl Authenticator {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate the form locally, then exchange it for a [`Session`].
    pub async fn login(&self, form: &LoginForm) -> AuthResult<Session> {
        form.validate().map_err(AuthError::Validation)?;

        let url = self.api.collection_url(LOGIN_COLLECTION);
        tracing::debug!("Logging in at {}", url);

        let response = self
            .api
            .http()
            .post(&url)
            .json(&form.to_request())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Login request failed");
                AuthError::InvalidCredentials
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Unexpected login response");
            AuthError::InvalidCredentials
        })?;

        tracing::info!(user_id = body.user_id, "Credentials accepted");
        Ok(Session::new(Some(body.user_id), body.email, body.user_type_id))
    }
}

#[derive(Deserialize)]
struct ServerMessage {
    message: String,
}

/// Creates accounts in the User collection.
#[derive(Clone)]
pub struct Registrar {
    api: ApiClient,
}

impl Registrar {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate the form and post the new user, stamped with `now`.
    ///
    /// A server-provided `{"message": ...}` is surfaced in
    /// [`AuthError::Rejected`].
    pub async fn register(&self, form: &RegistrationForm, now: DateTime<Utc>) -> AuthResult<()> {
        let new_user = form.to_new_user(now).map_err(AuthError::Validation)?;

        let url = self.api.collection_url(USER_COLLECTION);
        tracing::debug!("Registering user at {}", url);

        let response = self
            .api
            .http()
            .post(&url)
            .json(&new_user)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServerMessage>(&body)
                .map(|m| m.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            tracing::warn!(status = %status, "Registration rejected");
            return Err(AuthError::Rejected(message));
        }

        tracing::info!("User registered");
        Ok(())
    }
}
