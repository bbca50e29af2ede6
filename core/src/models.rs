use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Which sign-up endpoint an account belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Candidate,
    Employer,
}

impl AccountKind {
    /// Endpoint path relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Candidate => "auth/candidate",
            Self::Employer => "auth/employer",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Candidate => write!(f, "candidate"),
            Self::Employer => write!(f, "employer"),
        }
    }
}

/// Request body for `POST /auth/candidate`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Validate, bon::Builder)]
pub struct CandidateRegistration {
    #[builder(into)]
    #[validate(email)]
    pub email: String,

    #[builder(into)]
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request body for `POST /auth/employer`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Validate, bon::Builder)]
pub struct EmployerRegistration {
    #[builder(into)]
    #[validate(email)]
    pub email: String,

    #[builder(into)]
    #[validate(length(min = 8))]
    pub password: String,

    #[builder(into)]
    pub name: String,

    /// `+7` followed by ten digits
    #[builder(into)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

/// Accepts the phone layout the registration API expects: `+7` and ten digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let valid = phone
        .strip_prefix("+7")
        .is_some_and(|rest| rest.len() == 10 && rest.bytes().all(|b| b.is_ascii_digit()));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum RegistrationRequest {
    Candidate(CandidateRegistration),
    Employer(EmployerRegistration),
}

impl RegistrationRequest {
    pub fn kind(&self) -> AccountKind {
        match self {
            Self::Candidate(_) => AccountKind::Candidate,
            Self::Employer(_) => AccountKind::Employer,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::Candidate(c) => &c.email,
            Self::Employer(e) => &e.email,
        }
    }

    pub fn password(&self) -> &str {
        match self {
            Self::Candidate(c) => &c.password,
            Self::Employer(e) => &e.password,
        }
    }

    /// Checks the payload against the documented field rules without a round trip.
    pub fn validate_locally(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Self::Candidate(c) => c.validate(),
            Self::Employer(e) => e.validate(),
        }
    }
}

impl From<CandidateRegistration> for RegistrationRequest {
    fn from(value: CandidateRegistration) -> Self {
        Self::Candidate(value)
    }
}

impl From<EmployerRegistration> for RegistrationRequest {
    fn from(value: EmployerRegistration) -> Self {
        Self::Employer(value)
    }
}

/// Body of a `201 Created` registration response.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    #[serde(rename = "Bad Request")]
    BadRequest,
    Conflict,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::BadRequest => write!(f, "Bad Request"),
            Self::Conflict => write!(f, "Conflict"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

/// Failure body returned by the registration API for 4xx responses.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub error_code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            error_code: ErrorCode::BadRequest,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: 409,
            error_code: ErrorCode::Conflict,
            message: message.into(),
        }
    }
}
