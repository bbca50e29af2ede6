use std::sync::Arc;

use reqwest::StatusCode;

use super::LogDetail;
use crate::{Error, Result, client::ApiResponse, schema::Schema};

/// Expected outcome of a call: a status and, optionally, a body schema.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    status: StatusCode,
    schema: Option<Arc<Schema>>,
    log: LogDetail,
}

impl ResponseSpec {
    pub fn expect_status(status: StatusCode) -> Self {
        Self {
            status,
            schema: None,
            log: LogDetail::Status,
        }
    }

    pub fn with_schema(
        mut self,
        schema: Arc<Schema>,
    ) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn log(
        mut self,
        log: LogDetail,
    ) -> Self {
        self.log = log;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn log_detail(&self) -> LogDetail {
        self.log
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Checks the status, then the body shape.
    pub fn verify(
        &self,
        response: &ApiResponse,
    ) -> Result<()> {
        self.log
            .log_response(response.exchange());

        if response.status() != self.status {
            self.log
                .log_failure(response.exchange());
            return Err(Error::UnexpectedStatus {
                expected: self.status,
                exchange: Box::new(response.exchange().clone()),
            });
        }

        if let Some(schema) = &self.schema {
            let violations = schema.validate_bytes(response.body());
            if !violations.is_empty() {
                self.log
                    .log_failure(response.exchange());
                return Err(Error::Schema {
                    schema: schema.name.clone(),
                    violations,
                    exchange: Box::new(response.exchange().clone()),
                });
            }
        }

        Ok(())
    }
}
