//! Credential acquisition state machine.

use super::cache::{Credential, TokenCache};
use super::device_flow::DeviceFlow;
use super::error::AuthError;
use crate::client::build_client;
use serde::Deserialize;
use tracing::{info, warn};

/// Where the provider currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    /// No usable token; the device flow must run.
    NoCredential,
    /// A cached token is being checked against the platform.
    Validating(Credential),
    /// A token known to work.
    Authorized(Credential),
}

#[derive(Debug, Default, Deserialize)]
struct Viewer {
    login: Option<String>,
}

/// Checks `token` against the platform's "who am I" endpoint.
///
/// Any 2xx status means valid, whatever the body. Any other status or a
/// transport error counts as invalid.
pub async fn validate_token(api_base: &str, token: &str) -> bool {
    let octocrab = match build_client(api_base, token) {
        Ok(octocrab) => octocrab,
        Err(e) => {
            warn!(error = %e, "Cannot validate credential");
            return false;
        }
    };

    let response = match octocrab._get("/user").await {
        Ok(response) => response,
        Err(octocrab::Error::GitHub { source, .. }) => {
            warn!(status = %source.status_code, "Cached credential was rejected");
            return false;
        }
        Err(e) => {
            warn!(error = %e, "Failed to validate cached credential");
            return false;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(status = %status, "Cached credential was rejected");
        return false;
    }

    let viewer = match octocrab.body_to_string(response).await {
        Ok(body) => serde_json::from_str::<Viewer>(&body).unwrap_or_default(),
        Err(_) => Viewer::default(),
    };
    match viewer.login {
        Some(login) => info!(%login, "Cached credential is valid"),
        None => info!("Cached credential is valid"),
    }
    true
}

/// Produces a bearer token from the cache or, failing that, the device flow.
pub struct CredentialProvider {
    cache: TokenCache,
    device_flow: DeviceFlow,
    api_base: String,
    client_id: String,
    scope: String,
}

impl CredentialProvider {
    /// Creates a provider.
    pub fn new(
        cache: TokenCache,
        device_flow: DeviceFlow,
        api_base: impl Into<String>,
        client_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            device_flow,
            api_base: api_base.into(),
            client_id: client_id.into(),
            scope: scope.into(),
        }
    }

    /// Returns the state the provider starts in, based on the cache.
    pub fn initial_state(&self) -> CredentialState {
        match self.cache.load() {
            Some(credential) => CredentialState::Validating(credential),
            None => CredentialState::NoCredential,
        }
    }

    /// Advances the state machine by one transition.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the device flow fails.
    pub async fn step(&self, state: CredentialState) -> Result<CredentialState, AuthError> {
        Ok(match state {
            CredentialState::Validating(credential) => {
                if validate_token(&self.api_base, &credential.token).await {
                    CredentialState::Authorized(credential)
                } else {
                    info!("Discarding cached credential");
                    CredentialState::NoCredential
                }
            }
            CredentialState::NoCredential => {
                let credential = self
                    .device_flow
                    .authorize(&self.client_id, &self.scope)
                    .await?;
                self.cache.persist(&credential);
                CredentialState::Authorized(credential)
            }
            authorized @ CredentialState::Authorized(_) => authorized,
        })
    }

    /// Runs the state machine until a credential is authorized.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the device flow fails.
    pub async fn obtain(&self) -> Result<Credential, AuthError> {
        let mut state = self.initial_state();
        loop {
            state = match self.step(state).await? {
                CredentialState::Authorized(credential) => return Ok(credential),
                next => next,
            };
        }
    }
}
