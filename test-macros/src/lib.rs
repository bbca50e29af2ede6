mod scenario;

/// Declares a registration scenario as a `#[tokio::test]`.
///
/// ```ignore
/// scenario! {
///     id: candidate_registers,
///     name: "Candidate registration",
///     purpose: "A valid candidate gets tokens back",
///     expect_status: 201,
///     tags: vec![Tag::Smoke, Tag::Candidate],
///     kind: AccountKind::Candidate,
///     body: async |_ctx: &TestApiCtx| data::valid_candidate(data::VALID_PASSWORD),
///     assertions: |_ctx: &TestApiCtx, resp: TestResponse| {
///         resp.assert_tokens();
///     }
/// }
/// ```
///
/// `live: true` runs against the configured API instead of the stub and is
/// ignored unless requested.
#[proc_macro]
pub fn scenario(stream: proc_macro::TokenStream) -> proc_macro::TokenStream {
    scenario::scenario(stream)
}
