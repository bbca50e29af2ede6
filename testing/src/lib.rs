//! Shared harness for registration contract tests.
//!
//! [`TestApiCtx::new`] starts an in-process [`StubServer`] that follows the
//! published contract; [`TestApiCtx::live`] points the same scenarios at a
//! deployed API instead.

mod ctx;
mod request;
mod response;
pub mod stub;

pub use ctx::*;
pub use request::*;
pub use response::*;
pub use stub::{StubServer, StubState};

use tracing::Level;

pub fn logging() {
    use std::sync::Once;
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .init();
    });
}
