#![allow(clippy::result_large_err)]

use reqwest::StatusCode;

pub mod client;
pub mod config;
pub mod context;
pub mod fixtures;
pub mod schema;
pub mod spec;

pub use client::{ApiClient, ApiResponse};
pub use config::{ApiConfig, ConfigLoader};
pub use context::{DefaultCall, DefaultsGuard, SpecContext};
pub use schema::{Schema, SchemaCatalog, SchemaViolation};
pub use spec::{BaseSpec, Filter, LogDetail, Recorder, RequestSpec, ResponseSpec};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Validation errors: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A fixture call got neither a success nor the tolerated conflict.
    #[error("precondition setup failed with status {}\n{}", .0.status, .0)]
    Precondition(Box<Exchange>),

    #[error("expected status {expected}, got {}\n{exchange}", exchange.status)]
    UnexpectedStatus {
        expected: StatusCode,
        exchange: Box<Exchange>,
    },

    #[error("response body does not match schema `{schema}`: {}\n{exchange}", schema::render(violations))]
    Schema {
        schema: String,
        violations: Vec<SchemaViolation>,
        exchange: Box<Exchange>,
    },

    #[error("unknown schema reference `{0}`")]
    UnknownSchema(String),
    #[error("invalid status code {0}")]
    InvalidStatus(u16),
    #[error("no default specification is installed")]
    NoDefaults,
    #[error("a default specification is already installed")]
    DefaultsInstalled,
}

impl Error {
    /// The request/response pair behind a contract failure, if any.
    pub fn exchange(&self) -> Option<&Exchange> {
        match self {
            Self::Precondition(exchange)
            | Self::UnexpectedStatus { exchange, .. }
            | Self::Schema { exchange, .. } => Some(exchange),
            _ => None,
        }
    }
}

/// One completed HTTP call, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: reqwest::Method,
    pub url: url::Url,
    pub request_body: Option<String>,
    pub status: StatusCode,
    pub response_body: String,
}

impl std::fmt::Display for Exchange {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        match &self.request_body {
            Some(body) => writeln!(f, "> {body}")?,
            None => writeln!(f, "> <no body>")?,
        }
        writeln!(f, "< {}", self.status)?;
        write!(f, "< {}", self.response_body)
    }
}
