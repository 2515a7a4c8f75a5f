//! Command implementations

pub mod deploy;
pub mod script;
pub mod version;
