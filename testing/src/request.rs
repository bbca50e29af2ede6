//! Fluent builder for calls against the API under test

use regsuite_client::RequestSpec;
use regsuite_core::AccountKind;
use serde::Serialize;

use crate::{TestApiCtx, TestResponse};

pub struct RequestBuilder<'ctx> {
    ctx: &'ctx TestApiCtx,
    path: String,
    body: Option<serde_json::Value>,
}

impl<'ctx> RequestBuilder<'ctx> {
    pub fn post(
        ctx: &'ctx TestApiCtx,
        path: &str,
    ) -> Self {
        Self {
            ctx,
            path: path.to_string(),
            body: None,
        }
    }

    /// Registration endpoint for `kind`
    pub fn register(
        ctx: &'ctx TestApiCtx,
        kind: AccountKind,
    ) -> Self {
        Self::post(ctx, kind.path())
    }

    pub fn json<T: Serialize + ?Sized>(
        mut self,
        body: &T,
    ) -> Self {
        self.body = Some(serde_json::to_value(body).unwrap());
        self
    }

    pub fn spec(&self) -> RequestSpec {
        self
            .ctx
            .spec
            .request_spec(&self.path)
            .unwrap()
    }

    /// Send the request; transport failures panic, statuses never do
    pub async fn send(self) -> TestResponse {
        let spec = self.spec();

        let response = self
            .ctx
            .spec
            .client()
            .send(&spec, self.body.as_ref())
            .await
            .unwrap_or_else(|e| panic!("request to {} failed: {e}", spec.url()));

        TestResponse::new(response)
    }
}
