use regsuite_test_suite::*;
use test_case::test_case;

scenario! {
    id: candidate_registers_with_valid_data,
    name: "Candidate registration",
    purpose: "A candidate with a fresh email and valid password receives tokens",
    expect_status: 201,
    tags: vec![Tag::Smoke, Tag::Candidate],
    kind: AccountKind::Candidate,
    body: async |_ctx: &TestApiCtx| data::valid_candidate(data::VALID_PASSWORD),
    assertions: |ctx: &TestApiCtx, resp: TestResponse| {
        resp.assert_spec(&ctx.spec.response_spec(201, Some("authentication-response")).unwrap())
            .assert_tokens();
    }
}

scenario! {
    id: candidate_registers_with_generated_password,
    name: "Candidate registration with random password",
    purpose: "Any password of eight or more characters is accepted",
    expect_status: 201,
    tags: vec![Tag::Candidate],
    kind: AccountKind::Candidate,
    body: async |_ctx: &TestApiCtx| data::valid_candidate(data::generate_password()),
    assertions: |_ctx: &TestApiCtx, resp: TestResponse| {
        resp.assert_tokens();
    }
}

scenario! {
    id: candidate_short_password_is_rejected,
    name: "Candidate short password",
    purpose: "Passwords under eight characters are rejected with the candidate message",
    expect_status: 400,
    tags: vec![Tag::Candidate, Tag::Validation],
    kind: AccountKind::Candidate,
    body: async |_ctx: &TestApiCtx| data::valid_candidate(data::SHORT_PASSWORD),
    assertions: |ctx: &TestApiCtx, resp: TestResponse| {
        resp.assert_spec(&ctx.spec.response_spec(400, Some("error-response")).unwrap())
            .assert_bad_request_error(messages::CANDIDATE_SHORT_PASSWORD);
    }
}

scenario! {
    id: candidate_duplicate_email_conflicts,
    name: "Candidate duplicate email",
    purpose: "Registering an already registered email yields a conflict",
    expect_status: 409,
    tags: vec![Tag::Candidate, Tag::Duplicate],
    kind: AccountKind::Candidate,
    body: async |ctx: &TestApiCtx| {
        let email = ctx.ensure_account(AccountKind::Candidate, &data::unique_email()).await;
        data::candidate_with_email(email)
    },
    assertions: |ctx: &TestApiCtx, resp: TestResponse| {
        resp.assert_spec(&ctx.spec.response_spec(409, Some("error-response")).unwrap())
            .assert_conflict_error(messages::EMAIL_TAKEN);
    }
}

scenario! {
    id: candidate_email_taken_by_employer_conflicts,
    name: "Candidate email taken by employer",
    purpose: "Emails are unique across account kinds",
    expect_status: 409,
    tags: vec![Tag::Candidate, Tag::Duplicate],
    kind: AccountKind::Candidate,
    body: async |ctx: &TestApiCtx| {
        let account = ctx.create_account(AccountKind::Employer).await;
        data::candidate_with_email(account.email)
    },
    assertions: |_ctx: &TestApiCtx, resp: TestResponse| {
        resp.assert_conflict_error(messages::EMAIL_TAKEN);
    }
}

#[test_case("tests@@gmaill.com" ; "double at")]
#[test_case("@gmail.com" ; "missing local part")]
#[test_case("tests@.com" ; "domain starts with dot")]
#[test_case("AtestB@.com" ; "uppercase local dotted domain")]
#[tokio::test]
async fn candidate_invalid_email_is_rejected(email: &str) {
    let ctx = TestApiCtx::new();
    let mut harness = ScenarioHarness::with_metadata(
        format!("candidate_invalid_email_{email}"),
        "Candidate invalid email",
        "Malformed emails are rejected before any other field",
        400,
        vec![Tag::Candidate, Tag::Validation],
    );

    harness
        .run(&ctx, AccountKind::Candidate, &data::candidate_with_email(email))
        .await
        .assert_bad_request_error(messages::INVALID_EMAIL);

    assert!(ctx.stub().state().is_empty());
}

#[tokio::test]
async fn candidate_duplicate_first_call_succeeds() {
    let ctx = TestApiCtx::new();
    let body = data::valid_candidate(data::VALID_PASSWORD);

    ctx.register(AccountKind::Candidate)
        .json(&body)
        .send()
        .await
        .assert_created()
        .assert_tokens();

    ctx.register(AccountKind::Candidate)
        .json(&body)
        .send()
        .await
        .assert_conflict_error(messages::EMAIL_TAKEN);

    assert_eq!(ctx.recorder.len(), 2);
}
