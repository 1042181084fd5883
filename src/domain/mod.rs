pub mod models;
pub mod services;
pub mod errors;
pub mod parser;
pub mod snapshot;

pub use models::*;
pub use services::*;
pub use errors::*;
pub use parser::*;
pub use snapshot::*;
