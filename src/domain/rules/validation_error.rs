//! Rejection reasons raised by value objects and business rules

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::enumerations::PhysicalState;

/// Every reason a market request can be rejected for.
///
/// Each variant maps to a market reason code (see [`ValidationError::code`])
/// that is sent back to the sender in the rejection message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid GSRN number: {0}")]
    InvalidGsrnNumber(String),

    #[error("Metering point {0} not found")]
    UnknownMeteringPoint(String),

    #[error("Metering point {0} is already registered")]
    GsrnAlreadyRegistered(String),

    #[error("Invalid GLN number: {0}")]
    InvalidGlnNumber(String),

    #[error("Invalid effective date: {0}")]
    InvalidEffectiveDate(String),

    #[error("Invalid power limit: {0}")]
    InvalidPowerLimit(String),

    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid meter id: {0}")]
    InvalidMeterId(String),

    #[error("Invalid scheduled meter reading date: {0}")]
    InvalidScheduledMeterReadingDate(String),

    #[error("Invalid grid area code: {0}")]
    InvalidGridAreaCode(String),

    #[error("Grid area {0} not found")]
    UnknownGridArea(String),

    #[error("Invalid address {field}: {reason}")]
    InvalidAddressField { field: &'static str, reason: String },

    #[error("Unknown {enumeration} value: {value}")]
    UnknownEnumerationValue {
        enumeration: &'static str,
        value: String,
    },

    #[error("{field} is required")]
    MissingValue { field: &'static str },

    #[error("{field} is not allowed: {reason}")]
    ValueNotAllowed { field: &'static str, reason: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Sender {sender} is not the grid operator of grid area {grid_area}")]
    SenderNotGridOperator { sender: String, grid_area: String },

    #[error("Cannot {operation} a metering point in state {state}")]
    PhysicalStateNotAllowed {
        operation: &'static str,
        state: PhysicalState,
    },

    #[error("Metering point {0} is closed down")]
    AlreadyClosedDown(String),

    #[error("Metering point {gsrn} has no energy supplier at {effective_date}")]
    MissingEnergySupplier {
        gsrn: String,
        effective_date: String,
    },

    #[error("An energy supplier already starts supply at {0}")]
    DuplicateEnergySupplierStart(String),

    #[error("Parent metering point {0} not found")]
    UnknownParentMeteringPoint(String),

    #[error("Transaction id {0} has already been processed")]
    DuplicateTransactionId(String),
}

impl ValidationError {
    /// Market reason code reported in rejection messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidGsrnNumber(_) | Self::UnknownMeteringPoint(_) => "E10",
            Self::GsrnAlreadyRegistered(_) => "E11",
            Self::InvalidGlnNumber(_) => "E0I",
            Self::InvalidEffectiveDate(_) => "E0H",
            Self::InvalidGridAreaCode(_) | Self::UnknownGridArea(_) => "D02",
            Self::SenderNotGridOperator { .. } => "D50",
            Self::PhysicalStateNotAllowed { .. } => "D16",
            Self::AlreadyClosedDown(_) => "E19",
            Self::MissingEnergySupplier { .. } => "D36",
            Self::DuplicateEnergySupplierStart(_) => "E16",
            Self::UnknownParentMeteringPoint(_) => "D14",
            Self::DuplicateTransactionId(_) => "E01",
            Self::InvalidPowerLimit(_)
            | Self::InvalidCapacity(_)
            | Self::InvalidMeterId(_)
            | Self::InvalidScheduledMeterReadingDate(_)
            | Self::InvalidAddressField { .. }
            | Self::UnknownEnumerationValue { .. }
            | Self::MissingValue { .. }
            | Self::ValueNotAllowed { .. }
            | Self::InvalidInput { .. } => "E86",
        }
    }

    pub fn to_reason(&self) -> RejectionReason {
        RejectionReason {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable form of a [`ValidationError`], as stored on business
/// processes and sent in rejection messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RejectionReason {
    pub code: String,
    pub message: String,
}

impl From<&ValidationError> for RejectionReason {
    fn from(e: &ValidationError) -> Self {
        e.to_reason()
    }
}
