//! Command implementations

mod profile;
mod recommend;
mod serve;

pub use profile::cmd_profile;
pub use recommend::cmd_recommend;
pub use serve::cmd_serve;
