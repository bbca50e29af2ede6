use syn::parse::Parse;

const LIVE_IGNORE: &str = "requires a running registration API";

struct Opts {
    ignore: Option<syn::LitStr>,
    live: bool,
    id: syn::Ident,
    name: syn::LitStr,
    purpose: syn::LitStr,
    expect_status: syn::LitInt,
    tags: syn::Expr,
    kind: syn::Expr,
    body: syn::ExprClosure,
    assertions: Option<syn::ExprClosure>,
}

impl Parse for Opts {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut ignore = None;
        let mut live = false;
        let mut id = None;
        let mut name = None;
        let mut purpose = None;
        let mut expect_status = None;
        let mut tags = None;
        let mut kind = None;
        let mut body = None;
        let mut assertions = None;

        loop {
            let field = input.parse::<syn::Ident>()?;
            input.parse::<syn::Token![:]>()?;
            match field.to_string().as_str() {
                "id" => {
                    id = Some(input.parse::<syn::Ident>()?);
                },
                "ignore" => {
                    ignore = Some(input.parse::<syn::LitStr>()?);
                },
                "live" => {
                    let lit: syn::LitBool = input.parse()?;
                    live = lit.value;
                },
                "name" => {
                    name = Some(input.parse::<syn::LitStr>()?);
                },
                "purpose" => {
                    purpose = Some(input.parse::<syn::LitStr>()?);
                },
                "expect_status" => {
                    let lit: syn::LitInt = input.parse()?;
                    let status: u16 = lit.base10_parse()?;
                    if !(100..=599).contains(&status) {
                        return Err(syn::Error::new(
                            lit.span(),
                            "expect_status must be an HTTP status code",
                        ));
                    }
                    expect_status = Some(lit);
                },
                "tags" => {
                    tags = Some(input.parse::<syn::Expr>()?);
                },
                "kind" => {
                    kind = Some(input.parse::<syn::Expr>()?);
                },
                "body" => {
                    let closure: syn::ExprClosure = input.parse()?;
                    if closure.asyncness.is_none() {
                        return Err(syn::Error::new_spanned(
                            &closure,
                            "body must be an async closure taking the test context",
                        ));
                    }
                    body = Some(closure);
                },
                "assertions" => {
                    assertions = Some(input.parse::<syn::ExprClosure>()?);
                },
                _ => {
                    return Err(syn::Error::new(
                        field.span(),
                        format!("Unknown field: {}", field),
                    ));
                },
            }
            if !input.peek(syn::Token![,]) {
                break;
            }
            input.parse::<syn::Token![,]>()?;
            if !input.peek(syn::Ident) {
                break;
            }
        }

        Ok(Self {
            ignore,
            live,
            id: id.ok_or_else(|| syn::Error::new(input.span(), "Missing 'id' parameter"))?,
            name: name.ok_or_else(|| syn::Error::new(input.span(), "Missing 'name' parameter"))?,
            purpose: purpose
                .ok_or_else(|| syn::Error::new(input.span(), "Missing 'purpose' parameter"))?,
            expect_status: expect_status
                .ok_or_else(|| syn::Error::new(input.span(), "Missing 'expect_status' parameter"))?,
            tags: tags.ok_or_else(|| syn::Error::new(input.span(), "Missing 'tags' parameter"))?,
            kind: kind.ok_or_else(|| syn::Error::new(input.span(), "Missing 'kind' parameter"))?,
            body: body.ok_or_else(|| syn::Error::new(input.span(), "Missing 'body' parameter"))?,
            assertions,
        })
    }
}

pub fn scenario(stream: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let opts = syn::parse_macro_input!(stream as Opts);
    let id = opts.id.to_string();
    let id_as_ident = &opts.id;
    let name = &opts.name;
    let purpose = &opts.purpose;
    let expect_status = &opts.expect_status;
    let tags = &opts.tags;
    let kind = &opts.kind;
    let body = &opts.body;

    let ignore = match (opts.ignore, opts.live) {
        (Some(ignore_msg), _) => quote::quote! { #[ignore = #ignore_msg] },
        (None, true) => quote::quote! { #[ignore = #LIVE_IGNORE] },
        (None, false) => quote::quote! {},
    };

    let ctx = if opts.live {
        quote::quote! { regsuite_testing::TestApiCtx::live() }
    } else {
        quote::quote! { regsuite_testing::TestApiCtx::new() }
    };

    let assertions = match &opts.assertions {
        Some(assertions) => quote::quote! { (#assertions)(&ctx, response); },
        None => quote::quote! { let _ = response; },
    };

    quote::quote!(
        #ignore
        #[tokio::test]
        async fn #id_as_ident() {
            use regsuite_test_suite::ScenarioHarness;
            use regsuite_test_suite::Tag;

            let ctx = #ctx;

            let mut harness = ScenarioHarness::with_metadata(
                #id,
                #name,
                #purpose,
                #expect_status,
                #tags,
            );

            let body = (#body)(&ctx).await;
            let response = harness.run(&ctx, #kind, &body).await;

            #assertions
        }
    )
    .into()
}
