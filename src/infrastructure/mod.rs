//! Infrastructure layer providing external service integrations.
//!
//! This module contains file persistence, CSV exchange, command line
//! configuration and logging setup.

pub mod config;
pub mod csv_exchange;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use csv_exchange::*;
pub use logging::*;
pub use persistence::*;
