//! Application services

pub mod grid_area;
pub mod metering_point;
mod process;

#[cfg(test)]
mod tests;

pub use grid_area::GridAreaService;
pub use metering_point::{EnergySupplierSnapshot, MeteringPointDetails, MeteringPointService};
