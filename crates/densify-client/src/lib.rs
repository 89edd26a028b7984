//! Client library for the Densify optimization API
//!
//! This crate provides the core functionality for:
//! - Authenticating against a Densify instance
//! - Resolving cloud accounts and Kubernetes clusters to analyses
//! - Aggregating rightsizing recommendations across analyses
//! - Matching a single recommendation (with pod-level container merging)
//! - Instance-governance guardrails and Terraform-style rendering

pub mod client;
pub mod error;
pub mod guardrails;
pub mod models;
pub mod query;
pub mod recommend;
pub mod render;
pub mod resolve;

pub use client::{AuthResponse, Client};
pub use error::Error;
pub use guardrails::{GuardrailsList, GuardrailsNode};
pub use models::*;
pub use query::ApiQuery;
pub use recommend::RECOMMENDATION_TYPE_FALLBACK;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
