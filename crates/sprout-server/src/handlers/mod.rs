//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod challenges;
pub mod onboarding;
pub mod profile;
pub mod questions;
pub mod wallet;

// Re-export all handlers for use in router
pub use challenges::*;
pub use onboarding::*;
pub use profile::*;
pub use questions::*;
pub use wallet::*;
