//! Infrastructure layer module
//!
//! Configuration loading and logging setup. Database adapters live under
//! `adapters`.

pub mod config;
pub mod logging;
