//! Remote preconditions established before a scenario's own call.

use regsuite_core::{AccountKind, AuthenticationResponse, RegistrationRequest, data};
use reqwest::StatusCode;

use crate::{Error, Result, context::SpecContext};

fn registration_for(
    kind: AccountKind,
    email: String,
) -> RegistrationRequest {
    match kind {
        AccountKind::Candidate => data::candidate_with_email(email).into(),
        AccountKind::Employer => data::employer_with_email(email).into(),
    }
}

/// Makes sure an account with `email` (or a fresh address) is registered.
///
/// `201 Created` and `409 Conflict` both leave the account in place, so the
/// call is idempotent per email. Any other status is a precondition failure.
#[tracing::instrument(skip(ctx))]
pub async fn ensure_account_exists(
    ctx: &SpecContext,
    kind: AccountKind,
    email: Option<&str>,
) -> Result<String> {
    let email = email
        .map(str::to_owned)
        .unwrap_or_else(data::unique_email);
    let request = registration_for(kind, email.clone());
    let spec = ctx.request_spec(kind.path())?;

    let response = ctx.post(&spec, &request).await?;

    match response.status() {
        StatusCode::CREATED => tracing::info!(%email, "account created"),
        StatusCode::CONFLICT => tracing::info!(%email, "account already exists"),
        _ => return Err(Error::Precondition(Box::new(response.into_exchange()))),
    }

    Ok(email)
}

#[derive(Debug)]
pub struct RegisteredAccount {
    pub kind: AccountKind,
    pub email: String,
    pub password: String,
    pub tokens: AuthenticationResponse,
}

/// Registers a brand new account and requires `201 Created`.
#[tracing::instrument(skip(ctx))]
pub async fn create_unique_account(
    ctx: &SpecContext,
    kind: AccountKind,
) -> Result<RegisteredAccount> {
    let request = registration_for(kind, data::unique_email());
    let spec = ctx.request_spec(kind.path())?;

    let response = ctx.post(&spec, &request).await?;
    if response.status() != StatusCode::CREATED {
        return Err(Error::Precondition(Box::new(response.into_exchange())));
    }

    let tokens: AuthenticationResponse = response.json()?;
    tracing::info!(email = request.email(), "unique account created");

    Ok(RegisteredAccount {
        kind,
        email: request.email().to_string(),
        password: request.password().to_string(),
        tokens,
    })
}
