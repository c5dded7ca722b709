//! API client for the PlanPay subscription service.
//!
//! This module provides the `ApiClient` struct for authenticating
//! against the service and for making authenticated requests to the
//! plan catalog and payment endpoints.
//!
//! The bearer token lives in a slot shared by all clones of the client
//! and is attached to each outgoing request when it is built, so there
//! is no hidden client-global default header to keep in sync.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{PaymentCheckout, PaymentOutcome, PaymentStatus, Plan, UserSubscription};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// Applies to data endpoints only; authentication calls never retry.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

// Wire types for the auth endpoints

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct PaymentCreateRequest {
    subscription_id: i64,
    amount: f64,
}

#[derive(Debug, Serialize)]
struct PaymentExecuteRequest<'a> {
    payment_id: &'a str,
}

/// API client for the PlanPay service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and all clones share the same bearer slot.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    bearer: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token attached to subsequent requests.
    /// Visible to every clone of this client.
    pub fn set_bearer(&self, token: &str) {
        *self.bearer.write().expect("bearer lock poisoned") = Some(token.to_string());
    }

    /// Remove the bearer token; subsequent requests go out unauthenticated.
    pub fn clear_bearer(&self) {
        *self.bearer.write().expect("bearer lock poisoned") = None;
    }

    /// Current bearer token, if one is set
    pub fn bearer(&self) -> Option<String> {
        self.bearer.read().expect("bearer lock poisoned").clone()
    }

    /// The full `Authorization` header value for the current token
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer().map(|t| format!("Bearer {}", t))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(value) = self.authorization_header() {
            headers.insert(header::AUTHORIZATION, header::HeaderValue::from_str(&value)?);
        }
        Ok(headers)
    }

    // ===== Authentication =====

    /// Authenticate with email and password, returning the issued token.
    /// Does not touch the bearer slot; that is the session manager's job.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let body: LoginResponse = response.json().await?;
        if body.access_token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response contained an empty access token".to_string(),
            ));
        }

        debug!("Login accepted");
        Ok(body.access_token)
    }

    /// Create an account. Does not log the user in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let url = format!("{}/auth/register", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                name,
                email,
                password,
            })
            .send()
            .await?;

        Self::check_response(response).await?;
        debug!("Registration accepted");
        Ok(())
    }

    // ===== Response checking =====

    /// Check if response is successful, returning a typed error built from
    /// the body's `detail` field if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit
    /// (should retry), or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response.json().await?),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .post(url)
                .headers(self.auth_headers()?)
                .json(body)
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response.json().await?),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the public subscription plan catalog
    pub async fn fetch_plans(&self) -> Result<Vec<Plan>, ApiError> {
        let url = format!("{}/subscriptions", self.base_url);
        self.get(&url).await
    }

    /// Fetch the authenticated user's subscriptions
    pub async fn fetch_user_subscriptions(&self) -> Result<Vec<UserSubscription>, ApiError> {
        let url = format!("{}/user/subscriptions", self.base_url);
        self.get(&url).await
    }

    /// Start a payment for a plan, returning the provider checkout info
    pub async fn create_payment(
        &self,
        subscription_id: i64,
        amount: f64,
    ) -> Result<PaymentCheckout, ApiError> {
        let url = format!("{}/payment/create", self.base_url);
        self.post(
            &url,
            &PaymentCreateRequest {
                subscription_id,
                amount,
            },
        )
        .await
    }

    /// Execute a previously created payment
    pub async fn execute_payment(&self, payment_id: &str) -> Result<PaymentOutcome, ApiError> {
        let url = format!("{}/payment/execute", self.base_url);
        self.post(&url, &PaymentExecuteRequest { payment_id }).await
    }

    /// Fetch provider-side status for a payment
    pub async fn fetch_payment_status(&self, payment_id: &str) -> Result<PaymentStatus, ApiError> {
        let url = format!("{}/payment/status/{}", self.base_url, payment_id);
        self.get(&url).await
    }
}
