//! Core types and traits for the model jobs API.
//!
//! Job records, result sets, HTTP DTOs, and the `ModelStore` contract shared by the
//! store and API crates.

mod config;
mod dto;
mod lifecycle;
mod results;
mod traits;

pub use config::*;
pub use dto::*;
pub use lifecycle::*;
pub use results::*;
pub use traits::*;
