//! Scenario harness for the registration contract.
//!
//! Every scenario records a [`ScenarioResult`]; the results of one test
//! binary are appended to `./scenario-report.jsonl` when the process exits.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock, PoisonError},
};

pub use regsuite_core::{AccountKind, data, messages};
pub use regsuite_test_macros::scenario;
pub use regsuite_client::ApiResponse;
pub use regsuite_testing::{TestApiCtx, TestResponse};
use reqwest::StatusCode;
use serde::Serialize;

pub const REPORT_PATH: &str = "./scenario-report.jsonl";

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    /// Happy-path registrations.
    Smoke,

    /// Candidate endpoint.
    Candidate,

    /// Employer endpoint.
    Employer,

    /// Field validation failures.
    Validation,

    /// Email uniqueness.
    Duplicate,

    /// Runs against a deployed API.
    Live,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioMetadata {
    #[builder(into)]
    pub id: String,

    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub purpose: String,
    pub expect_status: u16,
    pub tags: Vec<Tag>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioResult {
    pub metadata: ScenarioMetadata,
    pub endpoint: String,
    pub actual_status: Option<u16>,
    pub matches_expectation: bool,
    pub error_message: Option<String>,
}

#[derive(Debug)]
pub struct ScenarioHarness {
    pub metadata: ScenarioMetadata,
    pub result: Option<ScenarioResult>,
}

impl ScenarioHarness {
    pub fn with_metadata(
        id: impl Into<String>,
        name: impl Into<String>,
        purpose: impl Into<String>,
        expect_status: u16,
        tags: Vec<Tag>,
    ) -> Self {
        regsuite_testing::logging();

        Self {
            metadata: ScenarioMetadata {
                id: id.into(),
                name: name.into(),
                purpose: purpose.into(),
                expect_status,
                tags,
            },
            result: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    fn expected(&self) -> StatusCode {
        StatusCode::from_u16(self.metadata.expect_status)
            .unwrap_or_else(|_| panic!("invalid expected status {}", self.metadata.expect_status))
    }

    /// Sends `body` to the registration endpoint for `kind` exactly once and
    /// records the outcome, whatever it is.
    #[tracing::instrument(skip(self, ctx, body), fields(
        scenario_id = self.id(),
        scenario_name = self.metadata.name,
        expect_status = self.metadata.expect_status,
    ))]
    pub async fn exchange<B: Serialize + ?Sized>(
        &mut self,
        ctx: &TestApiCtx,
        kind: AccountKind,
        body: &B,
    ) -> regsuite_client::Result<ApiResponse> {
        let expected = self.expected();
        let spec = ctx.register(kind).spec();
        let outcome = ctx
            .spec
            .client()
            .send(&spec, Some(body))
            .await;

        let (actual_status, error_message) = match &outcome {
            Ok(response) if response.status() == expected => (Some(response.status().as_u16()), None),
            Ok(response) => (
                Some(response.status().as_u16()),
                Some(response.exchange().to_string()),
            ),
            Err(err) => (None, Some(err.to_string())),
        };

        self.result = Some(ScenarioResult {
            metadata: self.metadata.clone(),
            endpoint: spec.url().to_string(),
            actual_status,
            matches_expectation: actual_status == Some(expected.as_u16()),
            error_message,
        });

        outcome
    }

    /// [`Self::exchange`], then asserts the expected status.
    pub async fn run<B: Serialize + ?Sized>(
        &mut self,
        ctx: &TestApiCtx,
        kind: AccountKind,
        body: &B,
    ) -> TestResponse {
        let expected = self.expected();
        match self.exchange(ctx, kind, body).await {
            Ok(response) => TestResponse::new(response).assert_status(expected),
            Err(err) => panic!("scenario {} could not reach the API: {err}", self.id()),
        }
    }

    pub fn result(&self) -> Option<&ScenarioResult> {
        self.result.as_ref()
    }
}

static SCENARIOS: OnceLock<Mutex<ScenarioCollector>> = OnceLock::new();

fn collector() -> &'static Mutex<ScenarioCollector> {
    SCENARIOS.get_or_init(|| Mutex::new(ScenarioCollector { scenarios: vec![] }))
}

impl Drop for ScenarioHarness {
    fn drop(&mut self) {
        if let Some(mut result) = self.result.take() {
            // a later assertion failed while the scenario was unwinding
            if std::thread::panicking() && result.matches_expectation {
                result.matches_expectation = false;
                result.error_message = Some(format!(
                    "scenario {} failed after receiving status {}",
                    result.metadata.id,
                    result
                        .actual_status
                        .map(|s| s.to_string())
                        .unwrap_or_default()
                ));
            }
            collector()
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .scenarios
                .push(result);
        }
    }
}

struct ScenarioCollector {
    scenarios: Vec<ScenarioResult>,
}

impl ScenarioCollector {
    fn write_report(
        &self,
        path: &Path,
    ) -> std::io::Result<()> {
        if self.scenarios.is_empty() {
            return Ok(());
        }
        serde_jsonlines::append_json_lines(path, &self.scenarios)
    }
}

/// Results recorded so far in this process.
pub fn recorded() -> Vec<ScenarioResult> {
    collector()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .scenarios
        .clone()
}

#[ctor::dtor]
fn dtor() {
    let collector = collector()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Err(err) = collector.write_report(&PathBuf::from(REPORT_PATH)) {
        eprintln!("failed to write {REPORT_PATH}: {err}");
    }
}
