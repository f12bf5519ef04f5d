use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::entities::User;
use crate::domain::errors::IdentityError;
use crate::domain::ports::IdentityProvider;

// Identity returned by the auth service's token verification endpoint.
#[derive(Debug, Deserialize)]
struct VerifiedIdentity {
    user_id: u64,
    display_name: String,
}

#[derive(Debug, Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

// Thin reqwest client that resolves bearer tokens through the auth service.
#[derive(Clone)]
pub struct AuthServiceIdentity {
    http: Client,
    pub base_url: String,
}

impl AuthServiceIdentity {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for AuthServiceIdentity {
    async fn current_user(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<Option<User>, IdentityError> {
        let Some(token) = bearer_token else {
            return Ok(None);
        };

        let url = format!("{}/auth/verify-token", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&VerifyTokenRequest { token })
            .send()
            .await
            .map_err(|err| IdentityError::Unavailable(err.to_string()))?;
        let status = response.status();

        // An unknown or expired token just means nobody is signed in.
        if status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityError::Unavailable(format!(
                "auth service returned {status}"
            )));
        }

        let identity = response
            .json::<VerifiedIdentity>()
            .await
            .map_err(|err| IdentityError::Decode(err.to_string()))?;

        Ok(Some(User {
            user_id: identity.user_id,
            display_name: identity.display_name,
        }))
    }
}

// Identity provider for deployments without an auth service.
#[derive(Clone, Copy, Default)]
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn current_user(
        &self,
        _bearer_token: Option<&str>,
    ) -> Result<Option<User>, IdentityError> {
        Ok(None)
    }
}
