//! Adapters implementing the domain ports.

pub mod logging_dispatcher;
pub mod sqlite;

pub use logging_dispatcher::LoggingDispatcher;
