#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Atelier generation proxy
//!
//! Wraps the `POST /api/generate` contract: base-URL validation and
//! normalization, a single round trip per prompt, and mapping of every
//! failure mode to one descriptive error.

mod client;
pub mod error;

pub use client::AtelierClient;
pub use error::{ClientError, Result};
