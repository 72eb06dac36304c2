//! RAG Web Browser library entry points.
//!
//! This crate exposes the pieces shared by every consumer of the RAG Web
//! Browser standby API: parameter normalization, the typed response schema,
//! response shaping, and the blocking HTTP client. Higher-level consumers
//! (CLI, Lambdas) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides an in-process stub of the upstream API.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod params;
pub mod shape;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{RagWebBrowserClient, SearchBackend, StandbyClient};
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use model::{CrawlInfo, CrawlStatus, OrganicResult, ResultMetadata, SearchResult};
pub use params::{normalize, OutputFormats, QueryParameters, SearchRequest};
pub use shape::{preview, shape_markdown_bodies, truncate_body};
