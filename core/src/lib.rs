//! Core components for signing API Gateway export requests.
//!
//! This crate provides the foundational types shared by the gwexport crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the HTTP transport and environment access
//! - **Error**: The single error type, classified by [`ErrorKind`]
//!
//! ## Example
//!
//! ```no_run
//! use gwexport_core::{Context, HttpSend, Result};
//! use async_trait::async_trait;
//! use bytes::Bytes;
//!
//! #[derive(Debug)]
//! struct EchoHttpSend;
//!
//! #[async_trait]
//! impl HttpSend for EchoHttpSend {
//!     async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
//!         Ok(http::Response::new(req.into_body()))
//!     }
//! }
//!
//! let ctx = Context::new().with_http_send(EchoHttpSend);
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};
