//! Business process tracking

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::rules::{RejectionReason, ValidationError};
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BusinessProcessType {
    CreateMeteringPoint,
    ConnectMeteringPoint,
    DisconnectMeteringPoint,
    ReconnectMeteringPoint,
    ChangeAddress,
    ChangeMeteringConfiguration,
    CloseDownMeteringPoint,
    ChangeEnergySupplier,
}

impl BusinessProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateMeteringPoint => "create_metering_point",
            Self::ConnectMeteringPoint => "connect_metering_point",
            Self::DisconnectMeteringPoint => "disconnect_metering_point",
            Self::ReconnectMeteringPoint => "reconnect_metering_point",
            Self::ChangeAddress => "change_address",
            Self::ChangeMeteringConfiguration => "change_metering_configuration",
            Self::CloseDownMeteringPoint => "close_down_metering_point",
            Self::ChangeEnergySupplier => "change_energy_supplier",
        }
    }
}

impl fmt::Display for BusinessProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessProcessType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_metering_point" => Ok(Self::CreateMeteringPoint),
            "connect_metering_point" => Ok(Self::ConnectMeteringPoint),
            "disconnect_metering_point" => Ok(Self::DisconnectMeteringPoint),
            "reconnect_metering_point" => Ok(Self::ReconnectMeteringPoint),
            "change_address" => Ok(Self::ChangeAddress),
            "change_metering_configuration" => Ok(Self::ChangeMeteringConfiguration),
            "close_down_metering_point" => Ok(Self::CloseDownMeteringPoint),
            "change_energy_supplier" => Ok(Self::ChangeEnergySupplier),
            other => Err(DomainError::Validation(format!(
                "Unknown business process type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BusinessProcessStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BusinessProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BusinessProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessProcessStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(DomainError::Validation(format!(
                "Unknown business process status: {}",
                other
            ))),
        }
    }
}

/// One market request and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProcess {
    pub id: Uuid,
    pub transaction_id: String,
    pub process_type: BusinessProcessType,
    pub gsrn: String,
    pub status: BusinessProcessStatus,
    pub errors: Vec<RejectionReason>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BusinessProcess {
    pub fn new(
        transaction_id: impl Into<String>,
        process_type: BusinessProcessType,
        gsrn: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id: transaction_id.into(),
            process_type,
            gsrn: gsrn.into(),
            status: BusinessProcessStatus::Pending,
            errors: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == BusinessProcessStatus::Pending
    }

    pub fn accept(&mut self) -> Result<(), DomainError> {
        self.complete(BusinessProcessStatus::Accepted, Vec::new())
    }

    pub fn reject(&mut self, errors: Vec<ValidationError>) -> Result<(), DomainError> {
        let reasons = errors.iter().map(RejectionReason::from).collect();
        self.complete(BusinessProcessStatus::Rejected, reasons)
    }

    fn complete(
        &mut self,
        status: BusinessProcessStatus,
        errors: Vec<RejectionReason>,
    ) -> Result<(), DomainError> {
        if !self.is_pending() {
            return Err(DomainError::Conflict(format!(
                "Business process {} is already {}",
                self.id, self.status
            )));
        }
        self.status = status;
        self.errors = errors;
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_once() {
        let mut process = BusinessProcess::new(
            "tx-1",
            BusinessProcessType::ConnectMeteringPoint,
            "571313100000000010",
        );
        assert!(process.is_pending());
        process.accept().unwrap();
        assert_eq!(process.status, BusinessProcessStatus::Accepted);
        assert!(process.completed_at.is_some());
        assert!(matches!(
            process.reject(vec![]),
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(process.status, BusinessProcessStatus::Accepted);
    }

    #[test]
    fn reject_keeps_errors() {
        let mut process = BusinessProcess::new(
            "tx-2",
            BusinessProcessType::CloseDownMeteringPoint,
            "571313100000000010",
        );
        process
            .reject(vec![ValidationError::AlreadyClosedDown("571313100000000010".into())])
            .unwrap();
        assert_eq!(process.status, BusinessProcessStatus::Rejected);
        assert_eq!(process.errors[0].code, "E19");
    }

    #[test]
    fn type_round_trips_through_str() {
        for t in [
            BusinessProcessType::CreateMeteringPoint,
            BusinessProcessType::ChangeEnergySupplier,
        ] {
            assert_eq!(t.as_str().parse::<BusinessProcessType>().unwrap(), t);
        }
        assert_eq!(
            "rejected".parse::<BusinessProcessStatus>().unwrap(),
            BusinessProcessStatus::Rejected
        );
        assert!("nope".parse::<BusinessProcessStatus>().is_err());
        assert!("nope".parse::<BusinessProcessType>().is_err());
    }
}
