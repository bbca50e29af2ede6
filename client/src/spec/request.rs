use std::sync::Arc;

use reqwest::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use super::{Filter, LogDetail};
use crate::{Result, config::ApiConfig};

const JSON: &str = "application/json";

/// Shared connection defaults every request template starts from.
#[derive(Debug, Clone)]
pub struct BaseSpec {
    base_url: url::Url,
    content_type: String,
    log: LogDetail,
    filters: Vec<Arc<dyn Filter>>,
}

impl BaseSpec {
    pub fn new(base_url: url::Url) -> Self {
        Self {
            base_url,
            content_type: JSON.to_string(),
            log: LogDetail::default(),
            filters: vec![],
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone()).with_log(config.log)
    }

    pub fn with_log(
        mut self,
        log: LogDetail,
    ) -> Self {
        self.log = log;
        self
    }

    pub fn with_filter(
        mut self,
        filter: Arc<dyn Filter>,
    ) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Overlays `path` on the base. The base itself is left untouched.
    pub fn request(
        &self,
        path: &str,
    ) -> Result<RequestSpec> {
        Ok(RequestSpec {
            method: Method::POST,
            url: overlay(&self.base_url, path)?,
            path: path.to_string(),
            content_type: self.content_type.clone(),
            headers: HeaderMap::new(),
            log: self.log,
            filters: self.filters.clone(),
        })
    }
}

/// Joins `path` below the base path, keeping any prefix such as `/api`.
fn overlay(
    base: &url::Url,
    path: &str,
) -> Result<url::Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

/// Immutable request template; builder methods return a new value.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    url: url::Url,
    path: String,
    content_type: String,
    headers: HeaderMap,
    log: LogDetail,
    filters: Vec<Arc<dyn Filter>>,
}

impl RequestSpec {
    pub fn method(
        mut self,
        method: Method,
    ) -> Self {
        self.method = method;
        self
    }

    pub fn header(
        mut self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn log(
        mut self,
        log: LogDetail,
    ) -> Self {
        self.log = log;
        self
    }

    pub fn filter(
        mut self,
        filter: Arc<dyn Filter>,
    ) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn http_method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn log_detail(&self) -> LogDetail {
        self.log
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Recorder;

    fn base(url: &str) -> BaseSpec {
        BaseSpec::new(url::Url::parse(url).unwrap())
    }

    #[test_case::test_case("http://localhost:8081", "auth/candidate", "http://localhost:8081/auth/candidate")]
    #[test_case::test_case("http://localhost:8081/", "/auth/employer", "http://localhost:8081/auth/employer")]
    #[test_case::test_case("http://localhost:8080/api", "auth/candidate", "http://localhost:8080/api/auth/candidate")]
    #[test_case::test_case("http://localhost:8080/api/", "/auth/candidate", "http://localhost:8080/api/auth/candidate")]
    fn path_overlay_keeps_base_prefix(
        base_url: &str,
        path: &str,
        expected: &str,
    ) {
        let spec = base(base_url).request(path).unwrap();
        assert_eq!(spec.url().as_str(), expected);
        assert_eq!(spec.path(), path);
    }

    #[test]
    fn building_templates_leaves_base_unchanged() {
        let base = base("http://localhost:8080/api").with_log(LogDetail::Status);

        let candidate = base
            .request("auth/candidate")
            .unwrap()
            .log(LogDetail::All)
            .header(
                reqwest::header::ACCEPT_LANGUAGE,
                HeaderValue::from_static("ru"),
            )
            .filter(Arc::new(Recorder::default()));
        let employer = base.request("auth/employer").unwrap();

        assert_eq!(base.base_url().as_str(), "http://localhost:8080/api");
        assert_eq!(candidate.log_detail(), LogDetail::All);
        assert_eq!(candidate.filters().len(), 1);
        assert_eq!(candidate.headers().len(), 1);

        assert_eq!(employer.log_detail(), LogDetail::Status);
        assert!(employer.filters().is_empty());
        assert!(employer.headers().is_empty());
        assert_eq!(employer.content_type(), "application/json");
        assert_eq!(employer.http_method(), &Method::POST);
    }
}
