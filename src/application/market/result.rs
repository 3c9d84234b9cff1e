use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::rules::{RejectionReason, ValidationError};
use crate::domain::{BusinessProcess, BusinessProcessStatus, BusinessProcessType};

/// Outcome of one business process, returned to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BusinessProcessResult {
    /// Absent when the request was rejected as a duplicate
    pub process_id: Option<Uuid>,
    pub transaction_id: String,
    pub process_type: BusinessProcessType,
    pub gsrn: String,
    pub status: BusinessProcessStatus,
    pub errors: Vec<RejectionReason>,
}

impl BusinessProcessResult {
    pub fn from_process(process: &BusinessProcess) -> Self {
        Self {
            process_id: Some(process.id),
            transaction_id: process.transaction_id.clone(),
            process_type: process.process_type,
            gsrn: process.gsrn.clone(),
            status: process.status,
            errors: process.errors.clone(),
        }
    }

    pub fn duplicate(transaction_id: &str, process_type: BusinessProcessType, gsrn: &str) -> Self {
        Self {
            process_id: None,
            transaction_id: transaction_id.to_string(),
            process_type,
            gsrn: gsrn.to_string(),
            status: BusinessProcessStatus::Rejected,
            errors: vec![RejectionReason::from(&ValidationError::DuplicateTransactionId(
                transaction_id.to_string(),
            ))],
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == BusinessProcessStatus::Accepted
    }

    pub fn codes(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.code.as_str()).collect()
    }
}
