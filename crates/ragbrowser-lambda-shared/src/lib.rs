//! Shared infrastructure for RAG Web Browser AWS Lambda functions.
//!
//! This crate provides common functionality used across Lambda handlers that
//! expose the RAG Web Browser as an agent action-group tool:
//!
//! - [`ActionGroupEvent`]: The action-group invocation payload, with validation
//! - [`ActionGroupResponse`]: The success envelope the agent platform expects
//! - [`ErrorResponse`]: The `{statusCode, body}` error envelope
//! - [`LambdaRuntime`]: Process-wide client configured once at cold start
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a scripted search backend and event
//! builders for Lambda handler testing. Enable the `test-utils` feature to
//! access it from dependent crates.

#![deny(warnings)]

mod requests;
mod response;
mod runtime;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use requests::{ActionGroupEvent, ActionParameter, Validate};
pub use response::{
    ActionGroupResponse, ActionResponse, ErrorResponse, ResponseBody, JSON_CONTENT_TYPE,
};
pub use runtime::{get_runtime, init_runtime, InitError, LambdaRuntime};
pub use tracing_init::{init_tracing, LOG_FORMAT_ENV};
