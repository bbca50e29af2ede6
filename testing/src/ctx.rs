//! Test API context - a stub (or a live endpoint) plus the client stack

use std::{collections::HashMap, sync::Arc};

use regsuite_client::{
    ApiConfig, ConfigLoader, Recorder, SpecContext,
    fixtures::{self, RegisteredAccount},
};
use regsuite_core::AccountKind;

use crate::{RequestBuilder, StubServer};

pub struct TestApiCtx {
    pub spec: SpecContext,
    pub recorder: Arc<Recorder>,
    stub: Option<StubServer>,
}

impl TestApiCtx {
    /// Context bound to a fresh in-process stub
    pub fn new() -> Self {
        Self::stubbed("")
    }

    /// Stub serving below a path prefix, so the base URL carries it too
    pub fn with_prefix(prefix: &str) -> Self {
        Self::stubbed(prefix)
    }

    fn stubbed(prefix: &str) -> Self {
        crate::logging();

        let stub = StubServer::start_with_prefix(prefix).unwrap();
        let config = ConfigLoader::default()
            .dir(std::env::temp_dir().join("regsuite-stub"))
            .env(HashMap::new())
            .base_url(stub.base_url())
            .load()
            .unwrap();

        Self::build(config, Some(stub))
    }

    /// Context bound to the API named by `API_BASE_URL` and friends
    pub fn live() -> Self {
        crate::logging();

        let config = ApiConfig::load(None).unwrap();
        Self::build(config, None)
    }

    fn build(
        config: ApiConfig,
        stub: Option<StubServer>,
    ) -> Self {
        let recorder = Arc::new(Recorder::default());
        let spec = SpecContext::new(config)
            .unwrap()
            .with_filter(recorder.clone());

        Self {
            spec,
            recorder,
            stub,
        }
    }

    /// The stub behind this context; panics for live contexts
    pub fn stub(&self) -> &StubServer {
        self.stub
            .as_ref()
            .expect("context is not backed by the stub")
    }

    pub fn is_live(&self) -> bool {
        self.stub.is_none()
    }

    pub fn post(
        &self,
        path: &str,
    ) -> RequestBuilder<'_> {
        RequestBuilder::post(self, path)
    }

    pub fn register(
        &self,
        kind: AccountKind,
    ) -> RequestBuilder<'_> {
        RequestBuilder::register(self, kind)
    }

    // Helper methods for common preconditions

    /// Make sure `email` is taken, returning it
    pub async fn ensure_account(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> String {
        fixtures::ensure_account_exists(&self.spec, kind, Some(email))
            .await
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub async fn create_account(
        &self,
        kind: AccountKind,
    ) -> RegisteredAccount {
        fixtures::create_unique_account(&self.spec, kind)
            .await
            .unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Default for TestApiCtx {
    fn default() -> Self {
        Self::new()
    }
}
