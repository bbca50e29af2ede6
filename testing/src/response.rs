//! Response wrapper with fluent assertions

use regsuite_client::{ApiResponse, Exchange, ResponseSpec};
use regsuite_core::{AuthenticationResponse, ErrorCode, ErrorResponse};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

/// Wrapper around [`ApiResponse`] whose assertions panic with the full exchange
pub struct TestResponse {
    inner: ApiResponse,
}

impl TestResponse {
    pub fn new(inner: ApiResponse) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn body_string(&self) -> String {
        self.inner.text().to_string()
    }

    pub fn exchange(&self) -> &Exchange {
        self.inner.exchange()
    }

    pub fn into_inner(self) -> ApiResponse {
        self.inner
    }

    // Status assertions

    /// Assert status equals expected, returns self for chaining
    pub fn assert_status(
        self,
        expected: StatusCode,
    ) -> Self {
        assert_eq!(
            self.status(),
            expected,
            "Expected status {expected}, got {}.\n{}",
            self.status(),
            self.exchange()
        );
        self
    }

    pub fn assert_created(self) -> Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_conflict(self) -> Self {
        self.assert_status(StatusCode::CONFLICT)
    }

    /// Verify against a response template, panicking with the rendered failure
    pub fn assert_spec(
        self,
        spec: &ResponseSpec,
    ) -> Self {
        if let Err(err) = spec.verify(&self.inner) {
            panic!("{err}");
        }
        self
    }

    // Body parsing

    /// Parse body as JSON, panics if parsing fails
    pub fn json<T: DeserializeOwned>(&self) -> T {
        self.inner.json().unwrap_or_else(|e| {
            panic!(
                "Failed to parse response body as JSON: {e}.\n{}",
                self.exchange()
            )
        })
    }

    pub fn error_response(&self) -> ErrorResponse {
        self.json()
    }

    pub fn tokens(&self) -> AuthenticationResponse {
        self.json()
    }

    // Body assertions

    /// Assert the error body carries the given code and exact message
    pub fn assert_error(
        self,
        code: ErrorCode,
        message: &str,
    ) -> Self {
        let err = self.error_response();
        assert_eq!(
            err.status,
            self.status().as_u16(),
            "Body status disagrees with HTTP status.\n{}",
            self.exchange()
        );
        assert_eq!(err.error_code, code, "Unexpected error code.\n{}", self.exchange());
        assert_eq!(err.message, message, "Unexpected error message.\n{}", self.exchange());
        self
    }

    pub fn assert_bad_request_error(
        self,
        message: &str,
    ) -> Self {
        self.assert_bad_request()
            .assert_error(ErrorCode::BadRequest, message)
    }

    pub fn assert_conflict_error(
        self,
        message: &str,
    ) -> Self {
        self.assert_conflict()
            .assert_error(ErrorCode::Conflict, message)
    }

    /// Assert an access token longer than ten characters and a refresh token
    pub fn assert_tokens(self) -> Self {
        let tokens = self.tokens();
        let access = tokens.access_token.expose_secret();
        assert!(
            access.len() > 10,
            "Access token too short ({} chars).\n{}",
            access.len(),
            self.exchange()
        );
        assert!(
            !tokens
                .refresh_token
                .expose_secret()
                .is_empty(),
            "Refresh token is empty.\n{}",
            self.exchange()
        );
        self
    }
}
