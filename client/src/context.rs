//! Per-scenario configuration context.
//!
//! A [`SpecContext`] bundles the HTTP client, the shared base template and the
//! schema catalog. Call sites that want implicit default specs install them
//! through [`SpecContext::install`]; the returned guard resets them when it is
//! dropped, whether the scenario finished or panicked.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    Error, Result,
    client::{ApiClient, ApiResponse},
    config::ApiConfig,
    schema::SchemaCatalog,
    spec::{BaseSpec, Filter, RequestSpec, ResponseSpec},
};

#[derive(Debug, Clone)]
struct Defaults {
    request: RequestSpec,
    response: ResponseSpec,
}

#[derive(Debug)]
pub struct SpecContext {
    config: ApiConfig,
    client: ApiClient,
    base: BaseSpec,
    schemas: SchemaCatalog,
    defaults: Mutex<Option<Defaults>>,
}

impl SpecContext {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        let base = BaseSpec::from_config(&config);

        Ok(Self {
            config,
            client,
            base,
            schemas: SchemaCatalog::default(),
            defaults: Mutex::new(None),
        })
    }

    pub fn with_schemas(
        mut self,
        schemas: SchemaCatalog,
    ) -> Self {
        self.schemas = schemas;
        self
    }

    /// Attaches instrumentation to every template built from this context.
    pub fn with_filter(
        mut self,
        filter: Arc<dyn Filter>,
    ) -> Self {
        self.base = self.base.with_filter(filter);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn base(&self) -> &BaseSpec {
        &self.base
    }

    pub fn schemas(&self) -> &SchemaCatalog {
        &self.schemas
    }

    pub fn request_spec(
        &self,
        path: &str,
    ) -> Result<RequestSpec> {
        self.base.request(path)
    }

    /// Expectation for `status`, optionally bound to a schema from the catalog.
    pub fn response_spec(
        &self,
        status: u16,
        schema: Option<&str>,
    ) -> Result<ResponseSpec> {
        let status = StatusCode::from_u16(status).map_err(|_| Error::InvalidStatus(status))?;
        let spec = ResponseSpec::expect_status(status).log(self.config.log);

        match schema {
            Some(name) => Ok(spec.with_schema(self.schemas.get(name)?)),
            None => Ok(spec),
        }
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        spec: &RequestSpec,
        body: &B,
    ) -> Result<ApiResponse> {
        self.client.post(spec, body).await
    }

    /// Sends once and verifies against `expect`.
    pub async fn post_expecting<B: Serialize + ?Sized>(
        &self,
        spec: &RequestSpec,
        expect: &ResponseSpec,
        body: &B,
    ) -> Result<ApiResponse> {
        let response = self.client.post(spec, body).await?;
        expect.verify(&response)?;
        Ok(response)
    }

    /// Installs default specs until the returned guard is dropped.
    pub fn install(
        &self,
        request: RequestSpec,
        response: ResponseSpec,
    ) -> Result<DefaultsGuard<'_>> {
        let mut defaults = self.lock_defaults();
        if defaults.is_some() {
            return Err(Error::DefaultsInstalled);
        }

        tracing::debug!(
            path = request.path(),
            status = %response.status(),
            "installing default specification"
        );
        *defaults = Some(Defaults { request, response });

        Ok(DefaultsGuard { ctx: self })
    }

    pub fn has_defaults(&self) -> bool {
        self.lock_defaults().is_some()
    }

    /// Starts a call that relies on the installed defaults.
    pub fn given(&self) -> Result<DefaultCall<'_>> {
        let defaults = self
            .lock_defaults()
            .clone()
            .ok_or(Error::NoDefaults)?;

        Ok(DefaultCall {
            ctx: self,
            request: defaults.request,
            response: defaults.response,
        })
    }

    fn lock_defaults(&self) -> MutexGuard<'_, Option<Defaults>> {
        self.defaults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps default specs installed on a [`SpecContext`] for its lifetime.
#[must_use = "defaults are reset as soon as the guard is dropped"]
#[derive(Debug)]
pub struct DefaultsGuard<'ctx> {
    ctx: &'ctx SpecContext,
}

impl Drop for DefaultsGuard<'_> {
    fn drop(&mut self) {
        self.ctx.lock_defaults().take();
        tracing::debug!("default specification reset");
    }
}

/// A call using the installed default request and response specs.
#[derive(Debug)]
pub struct DefaultCall<'ctx> {
    ctx: &'ctx SpecContext,
    request: RequestSpec,
    response: ResponseSpec,
}

impl DefaultCall<'_> {
    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    pub async fn post<B: Serialize + ?Sized>(
        self,
        body: &B,
    ) -> Result<ApiResponse> {
        self.ctx
            .post_expecting(&self.request, &self.response, body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ConfigLoader, spec::LogDetail};
    use std::{collections::HashMap, panic::AssertUnwindSafe};

    fn ctx() -> SpecContext {
        ctx_with_env(HashMap::new())
    }

    fn ctx_with_env(env: HashMap<String, String>) -> SpecContext {
        let config = ConfigLoader::default()
            .dir(std::env::temp_dir().join("regsuite-context-tests"))
            .env(env)
            .base_url("http://localhost:8080/api")
            .load()
            .unwrap();
        SpecContext::new(config).unwrap()
    }

    #[test]
    fn response_spec_resolves_schema_references() {
        let ctx = ctx();

        let spec = ctx
            .response_spec(400, Some("error-response"))
            .unwrap();
        assert_eq!(spec.status(), StatusCode::BAD_REQUEST);
        assert_eq!(spec.schema().unwrap().name, "error-response");

        assert!(matches!(
            ctx.response_spec(400, Some("nope")),
            Err(Error::UnknownSchema(_))
        ));
        assert!(matches!(
            ctx.response_spec(42, None),
            Err(Error::InvalidStatus(42))
        ));
    }

    #[test]
    fn response_spec_follows_configured_log_detail() {
        let quiet = ctx_with_env(HashMap::from([("API_LOG".to_string(), "off".to_string())]));
        assert_eq!(
            quiet
                .response_spec(201, None)
                .unwrap()
                .log_detail(),
            LogDetail::Off
        );

        assert_eq!(
            ctx()
                .response_spec(409, Some("error-response"))
                .unwrap()
                .log_detail(),
            LogDetail::Uri
        );
    }

    #[test]
    fn guard_resets_defaults_on_drop() {
        let ctx = ctx();
        assert!(matches!(ctx.given(), Err(Error::NoDefaults)));

        {
            let _guard = ctx
                .install(
                    ctx.request_spec("auth/candidate").unwrap(),
                    ResponseSpec::expect_status(StatusCode::CREATED),
                )
                .unwrap();

            let call = ctx.given().unwrap();
            assert_eq!(
                call.request().url().as_str(),
                "http://localhost:8080/api/auth/candidate"
            );
        }

        assert!(!ctx.has_defaults());
        assert!(matches!(ctx.given(), Err(Error::NoDefaults)));
    }

    #[test]
    fn second_install_is_refused_while_guard_lives() {
        let ctx = ctx();
        let request = ctx.request_spec("auth/employer").unwrap();
        let response = ResponseSpec::expect_status(StatusCode::CREATED);

        let guard = ctx
            .install(request.clone(), response.clone())
            .unwrap();
        assert!(matches!(
            ctx.install(request.clone(), response.clone()),
            Err(Error::DefaultsInstalled)
        ));

        drop(guard);
        let _again = ctx.install(request, response).unwrap();
    }

    #[test]
    fn guard_resets_defaults_when_scenario_panics() {
        let ctx = ctx();

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = ctx
                .install(
                    ctx.request_spec("auth/candidate").unwrap(),
                    ResponseSpec::expect_status(StatusCode::CONFLICT),
                )
                .unwrap();
            panic!("assertion failed inside scenario");
        }));

        assert!(outcome.is_err());
        assert!(!ctx.has_defaults());
    }
}
