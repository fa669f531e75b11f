//! # Vision Datasets
#![forbid(unsafe_code)]

/// Datasets
pub mod datasets;

/// Sample transforms
pub mod transforms;

/// Utilities
pub mod utils;
