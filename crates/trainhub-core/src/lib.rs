//! # trainhub-core
//!
//! Core crate for the TrainHub console. Contains configuration schemas,
//! the unified error system, and the trait seams between the session layer
//! and its HTTP transport.
//!
//! This crate has **no** internal dependencies on other TrainHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
