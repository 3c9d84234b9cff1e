//! Business process DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{BusinessProcess, BusinessProcessStatus, BusinessProcessType, RejectionReason};

#[derive(Debug, Serialize, ToSchema)]
pub struct BusinessProcessDto {
    pub id: Uuid,
    pub transaction_id: String,
    pub process_type: BusinessProcessType,
    pub gsrn: String,
    pub status: BusinessProcessStatus,
    pub errors: Vec<RejectionReason>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<BusinessProcess> for BusinessProcessDto {
    fn from(process: BusinessProcess) -> Self {
        Self {
            id: process.id,
            transaction_id: process.transaction_id,
            process_type: process.process_type,
            gsrn: process.gsrn,
            status: process.status,
            errors: process.errors,
            created_at: process.created_at,
            completed_at: process.completed_at,
        }
    }
}
