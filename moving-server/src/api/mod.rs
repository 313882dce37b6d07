//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check (public)
//! - [`boxes`] - box registration and browsing
//! - [`labels`] - label artifacts, reprint, and the print-event stream

pub mod boxes;
pub mod health;
pub mod labels;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
