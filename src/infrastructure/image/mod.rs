//! Image handling infrastructure.
//!
//! This module provides:
//! - The in-memory object URL registry
//! - PNG crop rasterization
//! - Placeholder color memoization

pub mod color_store;
pub mod object_urls;
pub mod rasterizer;

pub use color_store::{DEFAULT_COLOR_CAPACITY, LruColorStore};
pub use object_urls::InMemoryObjectUrlRegistry;
pub use rasterizer::PngRasterizer;
