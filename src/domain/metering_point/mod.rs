//! Metering point aggregate
//!
//! A metering point moves New → Connected ⇄ Disconnected → ClosedDown.
//! Every operation has a `can_*` check returning all broken rules and a
//! mutation that records a [`MeteringPointEvent`].

pub mod energy_suppliers;
pub mod events;
pub mod master_data;
pub mod model;
pub mod repository;
pub mod rules;

pub use energy_suppliers::{EnergySupplierDetails, EnergySuppliers};
pub use events::MeteringPointEvent;
pub use master_data::{MasterData, MasterDataInput, MeteringConfiguration};
pub use model::{MeteringPoint, MeteringPointId, MeteringPointState};
pub use repository::MeteringPointRepository;
pub use rules::MasterDataValidator;
