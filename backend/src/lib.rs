//! Room booking service library.
//!
//! Domain types and services live in [`domain`]; HTTP handlers in
//! [`inbound`]; Diesel, in-memory, and password hashing adapters in
//! [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
