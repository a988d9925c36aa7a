//! Doctor onboarding backend.
//!
//! A contract for a newly hired doctor walks through the departments of the
//! hospital as a set of tasks. [`domain`] holds the workflow rules,
//! [`inbound::http`] the REST surface and [`outbound`] the record stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
