//! Domain layer for the task generation engine
//!
//! This module contains the business records, task model and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
