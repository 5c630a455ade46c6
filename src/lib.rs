//! Client for the coding-challenge and discussion platform - Library exports
//!
//! (c) Softlandia 2025

pub mod api;
pub mod core;
pub mod infrastructure;
pub mod render;

pub use crate::core::error::{ApiError, Result};
pub use crate::core::traits::PlatformApi;
pub use crate::infrastructure::client::HttpPlatformApi;
pub use crate::infrastructure::config::ApiConfig;
