//! Domain layer: pure deployment types, validation, and remote batch builders.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod deploy;
pub mod error;
pub mod provision;
pub mod report;
pub mod script;

pub use config::{DeployDefaults, DeploymentConfig, InputField, OperatorInput, Secret};
pub use deploy::BuildDescriptor;
pub use error::{DeployError, ErrorCategory};
pub use report::{CheckoutAction, DeploymentReport, Phase, Reachability};
pub use script::RemoteScript;
