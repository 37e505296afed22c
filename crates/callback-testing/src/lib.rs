//! Fake user application for exercising a runtime's app callback client.
//!
//! Provides `MockServer` (canned answers, injected errors, recorded bulk
//! deliveries), its tonic service implementations, an in-process harness and
//! a JSON fixture loader. Intended for test code and the `mock-app` tool only.

pub mod error;
pub mod fixture;
pub mod grpc;
pub mod harness;
pub mod mock;

pub use error::MockServerError;
pub use harness::MockAppServer;
pub use mock::{JSON_CONTENT_TYPE, MockServer, Reply};
