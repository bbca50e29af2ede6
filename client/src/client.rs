use regsuite_core::ErrorResponse;
use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::Serialize;

use crate::{Exchange, Result, config::ApiConfig, spec::RequestSpec};

/// Thin HTTP client that sends request templates and keeps the full exchange.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()?;

        Ok(Self { client })
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        spec: &RequestSpec,
        body: &B,
    ) -> Result<ApiResponse> {
        self.send(spec, Some(body)).await
    }

    /// Sends `spec` once. Non-2xx statuses are returned, not raised; expectations
    /// decide what counts as a failure.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        spec: &RequestSpec,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let request_body = body
            .map(serde_json::to_string)
            .transpose()?;

        for filter in spec.filters() {
            filter.on_request(spec, request_body.as_deref());
        }
        spec.log_detail()
            .log_request(spec.http_method(), spec.url(), request_body.as_deref());

        let mut request = self
            .client
            .request(spec.http_method().clone(), spec.url().clone())
            .header(CONTENT_TYPE, spec.content_type())
            .headers(spec.headers().clone());

        if let Some(body) = &request_body {
            request = request.body(body.clone());
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        let exchange = Exchange {
            method: spec.http_method().clone(),
            url: spec.url().clone(),
            request_body,
            status,
            response_body: String::from_utf8_lossy(&body).to_string(),
        };

        for filter in spec.filters() {
            filter.on_response(&exchange);
        }

        Ok(ApiResponse { exchange, body })
    }
}

/// A received response together with the request that produced it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    exchange: Exchange,
    body: bytes::Bytes,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.exchange.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> &str {
        &self.exchange.response_body
    }

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    pub fn into_exchange(self) -> Exchange {
        self.exchange
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn error_response(&self) -> Result<ErrorResponse> {
        self.json()
    }
}

#[cfg(test)]
impl ApiResponse {
    pub(crate) fn canned(
        status: StatusCode,
        body: &str,
    ) -> Self {
        Self {
            exchange: Exchange {
                method: reqwest::Method::POST,
                url: url::Url::parse("http://localhost:8081/auth/candidate").unwrap(),
                request_body: Some(r#"{"email":"a@b.co","password":"12345678"}"#.into()),
                status,
                response_body: body.to_string(),
            },
            body: bytes::Bytes::copy_from_slice(body.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, spec::{BaseSpec, LogDetail}};

    #[tokio::test]
    async fn configured_read_timeout_ends_a_silent_call() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = vec![];
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ApiConfig {
            base_url: url::Url::parse(&format!("http://{addr}")).unwrap(),
            connect_timeout_ms: 1_000,
            read_timeout_ms: 100,
            log: LogDetail::Off,
        };
        let client = ApiClient::new(&config).unwrap();
        let spec = BaseSpec::from_config(&config)
            .request("auth/candidate")
            .unwrap();

        let started = std::time::Instant::now();
        let err = client
            .post(&spec, &serde_json::json!({"email": "a@b.co"}))
            .await
            .unwrap_err();

        let Error::Reqwest(err) = &err else {
            panic!("expected a transport error, got {err}");
        };
        assert!(err.is_timeout(), "not a timeout: {err:?}");
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }
}
