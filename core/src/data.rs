//! Synthetic payload data.
//!
//! Generated emails combine a millisecond timestamp with a v4 UUID, so two
//! calls never collide within a run. Scenarios that need a collision reuse a
//! fixed address instead.

use rand::{Rng, distr::Alphanumeric};

use crate::models::{CandidateRegistration, EmployerRegistration};

/// Password that satisfies the minimum length rule exactly.
pub const VALID_PASSWORD: &str = "12345678";

/// Password one rule short of valid.
pub const SHORT_PASSWORD: &str = "1234";

pub const INVALID_PHONE: &str = "123";

/// Addresses the API must reject as malformed.
pub const INVALID_EMAILS: &[&str] = &[
    "tests@@gmaill.com",
    "@gmail.com",
    "tests@.com",
    "AtestB@.com",
];

const GENERATED_PASSWORD_LEN: usize = 12;

const PHONE_PREFIX: &str = "+7988";

pub fn unique_email() -> String {
    format!(
        "qa+{}-{}@test.local",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4()
    )
}

pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

pub fn generate_name() -> String {
    format!("Test name-{}", uuid::Uuid::new_v4())
}

/// Operator prefix followed by a seven digit subscriber number.
pub fn generate_phone() -> String {
    let subscriber: u32 = rand::rng().random_range(1_000_000..9_999_999);
    format!("{PHONE_PREFIX}{subscriber}")
}

pub fn valid_candidate(password: impl Into<String>) -> CandidateRegistration {
    CandidateRegistration::builder()
        .email(unique_email())
        .password(password)
        .build()
}

pub fn valid_employer(password: impl Into<String>) -> EmployerRegistration {
    EmployerRegistration::builder()
        .email(unique_email())
        .password(password)
        .name(generate_name())
        .phone(generate_phone())
        .build()
}

/// Candidate with the given email and a generated valid password.
pub fn candidate_with_email(email: impl Into<String>) -> CandidateRegistration {
    CandidateRegistration::builder()
        .email(email)
        .password(generate_password())
        .build()
}

/// Employer with the given email and generated valid remaining fields.
pub fn employer_with_email(email: impl Into<String>) -> EmployerRegistration {
    EmployerRegistration::builder()
        .email(email)
        .password(generate_password())
        .name(generate_name())
        .phone(generate_phone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RegistrationRequest, messages::MIN_PASSWORD_LEN, models::validate_phone};
    use std::collections::HashSet;
    use validator::{Validate, ValidateEmail};

    #[test]
    fn emails_are_unique_within_a_run() {
        let emails: HashSet<String> = (0..2_000).map(|_| unique_email()).collect();
        assert_eq!(emails.len(), 2_000);
    }

    #[test]
    fn generated_email_matches_documented_layout() {
        let email = unique_email();

        assert!(email.starts_with("qa+"), "{email}");
        assert!(email.ends_with("@test.local"), "{email}");
        assert!(email.validate_email(), "{email}");
    }

    #[test]
    fn generated_password_meets_minimum_length() {
        for _ in 0..100 {
            let password = generate_password();
            assert!(password.len() >= MIN_PASSWORD_LEN);
            assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn generated_phone_has_operator_prefix_and_fixed_width() {
        for _ in 0..100 {
            let phone = generate_phone();
            assert!(phone.starts_with(PHONE_PREFIX), "{phone}");
            assert_eq!(phone.len(), PHONE_PREFIX.len() + 7, "{phone}");
            assert!(validate_phone(&phone).is_ok(), "{phone}");
        }
    }

    #[test]
    fn invalid_corpus_is_rejected_locally() {
        for email in INVALID_EMAILS {
            assert!(!email.validate_email(), "{email} should be invalid");
        }
        assert!(validate_phone(INVALID_PHONE).is_err());
        assert!(SHORT_PASSWORD.len() < MIN_PASSWORD_LEN);
        assert_eq!(VALID_PASSWORD.len(), MIN_PASSWORD_LEN);
    }

    #[test]
    fn factories_produce_valid_payloads() {
        let candidate = valid_candidate(VALID_PASSWORD);
        assert_eq!(candidate.password, VALID_PASSWORD);
        assert!(candidate.validate().is_ok());

        let employer = valid_employer(VALID_PASSWORD);
        assert!(employer.validate().is_ok());

        let fixed = employer_with_email("employertest@gmail.com");
        assert_eq!(fixed.email, "employertest@gmail.com");
        assert!(
            RegistrationRequest::from(fixed)
                .validate_locally()
                .is_ok()
        );
    }
}
