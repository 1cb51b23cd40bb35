pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod io;
pub mod model;
pub mod registry;

pub use error::{ExtractError, Result};
