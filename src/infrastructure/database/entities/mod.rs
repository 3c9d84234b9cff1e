//! Database entities module

pub mod business_process;
pub mod energy_supplier;
pub mod grid_area;
pub mod metering_point;

pub use business_process::Entity as BusinessProcess;
pub use energy_supplier::Entity as EnergySupplier;
pub use grid_area::Entity as GridArea;
pub use metering_point::Entity as MeteringPoint;
