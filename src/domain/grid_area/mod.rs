//! Grid area aggregate

pub mod model;
pub mod repository;

pub use model::{GridArea, GridAreaLinkId};
pub use repository::GridAreaRepository;
