//! # votehub-core
//!
//! Core crate for VoteHub. Contains the unified error system, configuration
//! schemas, the collaborator traits (shared store and input guard), and the
//! store path namespace.
//!
//! This crate has **no** internal dependencies on other VoteHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
