use regsuite_client::{Error, ResponseSpec};
use regsuite_test_suite::*;
use reqwest::StatusCode;

#[tokio::test]
async fn installed_defaults_drive_calls_until_reset() {
    let ctx = TestApiCtx::new();
    let spec = &ctx.spec;

    {
        let _defaults = spec
            .install(
                spec.request_spec(AccountKind::Candidate.path())
                    .unwrap(),
                spec.response_spec(201, Some("authentication-response"))
                    .unwrap(),
            )
            .unwrap();

        for _ in 0..2 {
            spec.given()
                .unwrap()
                .post(&data::valid_candidate(data::VALID_PASSWORD))
                .await
                .unwrap();
        }
    }

    assert!(!spec.has_defaults());
    assert!(matches!(spec.given(), Err(Error::NoDefaults)));
    assert_eq!(ctx.stub().state().len(), 2);
}

#[tokio::test]
async fn defaults_report_contract_breaks() {
    let ctx = TestApiCtx::new();
    let spec = &ctx.spec;
    let email = ctx
        .ensure_account(AccountKind::Employer, &data::unique_email())
        .await;

    let _defaults = spec
        .install(
            spec.request_spec(AccountKind::Employer.path())
                .unwrap(),
            ResponseSpec::expect_status(StatusCode::CREATED),
        )
        .unwrap();

    let err = spec
        .given()
        .unwrap()
        .post(&data::employer_with_email(email))
        .await
        .unwrap_err();

    let Error::UnexpectedStatus { expected, exchange } = &err else {
        panic!("expected a status mismatch, got {err}");
    };
    assert_eq!(*expected, StatusCode::CREATED);
    assert_eq!(exchange.status, StatusCode::CONFLICT);
    assert!(err.to_string().contains(messages::EMAIL_TAKEN));
}

#[tokio::test]
async fn contexts_do_not_share_defaults() {
    let first = TestApiCtx::new();
    let second = TestApiCtx::new();

    let _defaults = first
        .spec
        .install(
            first
                .spec
                .request_spec(AccountKind::Candidate.path())
                .unwrap(),
            ResponseSpec::expect_status(StatusCode::CREATED),
        )
        .unwrap();

    assert!(first.spec.has_defaults());
    assert!(!second.spec.has_defaults());
}
