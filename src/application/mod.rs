//! Application layer managing state and user workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the grid store applies edits and emits change notifications, the app
//! state tracks selection, modes and input buffers.

pub mod state;
pub mod store;

pub use state::*;
pub use store::*;
