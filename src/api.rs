use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use log::{error, warn};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::config;
use crate::profile::models::{SendOtpRequest, User, UserProfile, ValidateOtpRequest};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server answered {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("could not read response: {0}")]
    Decode(String),
    #[error("could not encode request: {0}")]
    Encode(String),
}

/// The subscription endpoints of the backend. Nothing here retries or times
/// out; every call resolves once with whatever the server (or the network) said.
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait SubscriptionApi {
    async fn fetch_profile(&self, email: String) -> Result<UserProfile, ApiError>;

    async fn send_otp(&self, request: SendOtpRequest) -> Result<(), ApiError>;

    /// Returns the updated user on success.
    async fn validate_otp(&self, request: ValidateOtpRequest) -> Result<User, ApiError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpSubscriptionApi {
    base_url: String,
}

impl HttpSubscriptionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn profile_url(&self, email: &str) -> String {
        self.url(&format!("/user-profile?email={}", urlencoding::encode(email)))
    }
}

impl Default for HttpSubscriptionApi {
    fn default() -> Self {
        Self::new(config::get_backend_url())
    }
}

// Non-2xx bodies are plain text error messages meant for the user.
async fn rejection(response: Response) -> ApiError {
    let status = response.status();
    warn!("Backend rejected {} with status {}", response.url(), status);
    rejection_from(status, response.text().await)
}

fn rejection_from(status: u16, body: Result<String, gloo_net::Error>) -> ApiError {
    match body {
        Ok(message) => ApiError::Rejected { status, message },
        Err(e) => {
            error!("Unreadable error body ({}): {}", status, e);
            ApiError::Decode(e.to_string())
        }
    }
}

fn network(e: gloo_net::Error) -> ApiError {
    error!("Network error: {}", e);
    ApiError::Network(e.to_string())
}

#[async_trait(?Send)]
impl SubscriptionApi for HttpSubscriptionApi {
    async fn fetch_profile(&self, email: String) -> Result<UserProfile, ApiError> {
        let response = Request::get(&self.profile_url(&email))
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(rejection(response).await);
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_otp(&self, request: SendOtpRequest) -> Result<(), ApiError> {
        let response = Request::post(&self.url("/send-otp"))
            .json(&request)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    async fn validate_otp(&self, request: ValidateOtpRequest) -> Result<User, ApiError> {
        let response = Request::post(&self.url("/validate-otp"))
            .json(&request)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(rejection(response).await);
        }

        response
            .json::<User>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
