//! GradeFlow avatar - authenticated avatar loading and crop/zoom editing.
//!
//! This crate fetches protected avatar images with the signed-in user's
//! bearer token, exposes them as revocable local URLs, and provides the
//! editor that turns a picked photo into the square PNG the GradeFlow API
//! stores as the user's avatar.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "gradeflow-avatar";
