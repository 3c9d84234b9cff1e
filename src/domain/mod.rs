//! Domain layer: value objects, enumerations, business rules and aggregates

pub mod business_process;
pub mod enumerations;
pub mod grid_area;
pub mod metering_point;
pub mod repositories;
pub mod rules;
pub mod values;

pub use business_process::{BusinessProcess, BusinessProcessStatus, BusinessProcessType};
pub use grid_area::{GridArea, GridAreaLinkId};
pub use metering_point::{MeteringPoint, MeteringPointEvent, MeteringPointId};
pub use repositories::{DomainResult, RepositoryProvider};
pub use rules::{BusinessRulesValidationResult, RejectionReason, ValidationError};

pub use crate::shared::errors::DomainError;
