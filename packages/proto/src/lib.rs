//! Generated message types and tonic stubs for the app callback contract.
//!
//! `common::v1` holds the invocation messages shared with other runtime APIs;
//! `runtime::v1` holds the callback services the runtime calls on an app.

pub use prost_types;

pub mod common {
    pub mod v1 {
        tonic::include_proto!("common.v1");
    }
}

pub mod runtime {
    pub mod v1 {
        tonic::include_proto!("runtime.v1");
    }
}
