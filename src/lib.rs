//! TCALC - Terminal Calculation Sheet Library
//!
//! A labeled-row calculation grid with live column totals and JSON/CSV
//! exchange, with a terminal front end built on ratatui.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
