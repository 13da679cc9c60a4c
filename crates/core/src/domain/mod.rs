pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::*;
