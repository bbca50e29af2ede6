//! In-process stand-in for the registration API.
//!
//! Answers exactly as the published contract describes: field validation in
//! the order email, password, phone; one account per email across both
//! account kinds; tokens on `201 Created`.

use std::net::SocketAddr;

use actix_web::{
    App, HttpResponse, HttpServer, ResponseError,
    dev::ServerHandle,
    http::StatusCode,
    post,
    web::{self, Json},
};
use dashmap::{DashMap, mapref::entry::Entry};
use rand::{Rng, distr::Alphanumeric};
use regsuite_core::{
    AccountKind, CandidateRegistration, EmployerRegistration, ErrorResponse, messages,
};
use validator::{Validate, ValidationErrors};

#[derive(thiserror::Error, Debug)]
enum StubError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{}", messages::EMAIL_TAKEN)]
    Conflict,
}

impl ResponseError for StubError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::BadRequest(message) => ErrorResponse::bad_request(*message),
            Self::Conflict => ErrorResponse::conflict(messages::EMAIL_TAKEN),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuedTokens {
    access_token: String,
    refresh_token: String,
}

impl IssuedTokens {
    fn issue() -> Self {
        Self {
            access_token: format!("stub.{}", random_token(40)),
            refresh_token: random_token(32),
        }
    }
}

fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Registered accounts, keyed by lowercased email.
#[derive(Debug, Default)]
pub struct StubState {
    accounts: DashMap<String, AccountKind>,
}

impl StubState {
    fn register(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<(), StubError> {
        match self.accounts.entry(email.to_lowercase()) {
            Entry::Occupied(_) => Err(StubError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(())
            },
        }
    }

    pub fn account(
        &self,
        email: &str,
    ) -> Option<AccountKind> {
        self.accounts
            .get(&email.to_lowercase())
            .map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn rejection(
    kind: AccountKind,
    errors: &ValidationErrors,
) -> &'static str {
    let fields = errors.field_errors();

    if fields.contains_key("email") {
        messages::INVALID_EMAIL
    } else if fields.contains_key("password") {
        match kind {
            AccountKind::Candidate => messages::CANDIDATE_SHORT_PASSWORD,
            AccountKind::Employer => messages::EMPLOYER_SHORT_PASSWORD,
        }
    } else {
        messages::INVALID_PHONE
    }
}

fn register(
    state: &StubState,
    kind: AccountKind,
    email: &str,
    validation: Result<(), ValidationErrors>,
) -> Result<HttpResponse, StubError> {
    validation.map_err(|errors| StubError::BadRequest(rejection(kind, &errors)))?;
    state.register(email, kind)?;

    tracing::debug!(%kind, email, "stub registered account");

    Ok(HttpResponse::Created().json(IssuedTokens::issue()))
}

#[post("/auth/candidate")]
async fn register_candidate(
    state: web::Data<StubState>,
    body: Json<CandidateRegistration>,
) -> Result<HttpResponse, StubError> {
    register(
        &state,
        AccountKind::Candidate,
        &body.email,
        body.validate(),
    )
}

#[post("/auth/employer")]
async fn register_employer(
    state: web::Data<StubState>,
    body: Json<EmployerRegistration>,
) -> Result<HttpResponse, StubError> {
    register(&state, AccountKind::Employer, &body.email, body.validate())
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(%err, "stub rejected request body");
        StubError::BadRequest(messages::MALFORMED_BODY).into()
    })
}

/// A running stub bound to an ephemeral localhost port.
pub struct StubServer {
    addr: SocketAddr,
    prefix: String,
    state: web::Data<StubState>,
    handle: ServerHandle,
}

impl StubServer {
    /// Starts serving on the current tokio runtime.
    pub fn start() -> std::io::Result<Self> {
        Self::start_with_prefix("")
    }

    /// Serves the endpoints below `prefix`, e.g. `/api`.
    pub fn start_with_prefix(prefix: &str) -> std::io::Result<Self> {
        let state = web::Data::new(StubState::default());
        let prefix = prefix.trim_end_matches('/').to_string();

        let app_state = state.clone();
        let scope = prefix.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .app_data(json_config())
                .service(
                    web::scope(&scope)
                        .service(register_candidate)
                        .service(register_employer),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))?;

        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| std::io::Error::other("stub server bound no address"))?;

        let server = server.run();
        let handle = server.handle();
        tokio::spawn(server);

        tracing::debug!(%addr, prefix, "registration stub started");

        Ok(Self {
            addr,
            prefix,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, self.prefix)
    }

    pub fn state(&self) -> &StubState {
        &self.state
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        // the stop command is sent before the returned future is polled
        drop(self.handle.stop(false));
    }
}
