//! Backend library modules.
//!
//! Two small sites share this crate: private notes with global slugs, and
//! public news whose comments only their authors may change. Both sit behind
//! one session-cookie login.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
