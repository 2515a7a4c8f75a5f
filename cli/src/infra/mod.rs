//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, git,
//! SSH/SCP, filesystem access, HTTP probing, prompts, and the run log file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod git;
pub mod network;
pub mod prompt;
pub mod run_log;
pub mod ssh;
