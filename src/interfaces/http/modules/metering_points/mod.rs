//! Metering point module: market processes and queries

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
