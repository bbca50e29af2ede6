//! Human-readable messages the registration API returns in `ErrorResponse::message`.
//!
//! The wording differs between endpoints for the same rule; both variants are
//! part of the published contract.

pub const INVALID_EMAIL: &str = "email: Неверный формат email";

pub const CANDIDATE_SHORT_PASSWORD: &str = "Пароль должен быть минимум 8 символов";

pub const EMPLOYER_SHORT_PASSWORD: &str = "password: Пароль должен содержать минимум 8 символов";

pub const INVALID_PHONE: &str = "Неверный формат телефона";

pub const EMAIL_TAKEN: &str = "Пользователь с такой почтой уже зарегистрирован";

pub const MALFORMED_BODY: &str = "Некорректное тело запроса";

/// Minimum password length enforced by both endpoints.
pub const MIN_PASSWORD_LEN: usize = 8;
