//! Market documents, format checks and process results

pub mod documents;
pub mod input;
pub mod result;

pub use documents::{
    AddressDto, ChangeAddress, ChangeEnergySupplier, ChangeMeteringConfiguration,
    CreateGridArea, CreateMeteringPoint, MarketDocument, PhysicalStateChange,
};
pub use input::validate_input;
pub use result::BusinessProcessResult;
