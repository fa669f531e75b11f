/// File utilities
pub mod files;
