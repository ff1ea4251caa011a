//! Credential configuration
//!
//! - [`embedded`]: constants generated by `build.rs`
//! - [`loader`]: flash override selection at boot

pub mod embedded;
pub mod loader;
