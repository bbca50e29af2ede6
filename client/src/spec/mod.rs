//! Reusable request templates and response expectations.

use std::sync::Mutex;

use serde::Deserialize;

use crate::Exchange;

mod request;
mod response;

pub use request::{BaseSpec, RequestSpec};
pub use response::ResponseSpec;

/// How much of a call is written to the `tracing` output.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogDetail {
    Off,
    Method,
    #[default]
    Uri,
    Status,
    Body,
    All,
    /// Quiet on success, the full exchange when an expectation fails.
    IfValidationFails,
}

impl LogDetail {
    pub(crate) fn log_request(
        &self,
        method: &reqwest::Method,
        url: &url::Url,
        body: Option<&str>,
    ) {
        match self {
            Self::Method => tracing::debug!(%method, "request"),
            Self::Uri => tracing::debug!(%method, %url, "request"),
            Self::Body | Self::All => {
                tracing::debug!(%method, %url, body = body.unwrap_or_default(), "request")
            },
            Self::Off | Self::Status | Self::IfValidationFails => {},
        }
    }

    pub(crate) fn log_response(
        &self,
        exchange: &Exchange,
    ) {
        match self {
            Self::Status => tracing::debug!(status = %exchange.status, "response"),
            Self::Body | Self::All => tracing::debug!(
                status = %exchange.status,
                body = %exchange.response_body,
                "response"
            ),
            Self::Off | Self::Method | Self::Uri | Self::IfValidationFails => {},
        }
    }

    pub(crate) fn log_failure(
        &self,
        exchange: &Exchange,
    ) {
        if *self != Self::Off {
            tracing::warn!("expectation failed\n{exchange}");
        }
    }
}

/// Instrumentation attached to a request template and run around every call.
pub trait Filter: Send + Sync + std::fmt::Debug {
    fn on_request(
        &self,
        _spec: &RequestSpec,
        _body: Option<&str>,
    ) {
    }

    fn on_response(
        &self,
        _exchange: &Exchange,
    ) {
    }
}

/// Keeps every completed exchange in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    exchanges: Mutex<Vec<Exchange>>,
}

impl Recorder {
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.exchanges
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.exchanges
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Filter for Recorder {
    fn on_response(
        &self,
        exchange: &Exchange,
    ) {
        self.exchanges
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(exchange.clone());
    }
}
