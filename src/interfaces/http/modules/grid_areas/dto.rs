//! Grid area DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::GridArea;

#[derive(Debug, Serialize, ToSchema)]
pub struct GridAreaDto {
    pub id: Uuid,
    /// Id referenced by metering points in the area
    pub link_id: Uuid,
    pub code: String,
    pub name: String,
    pub price_area: String,
    pub operator_gln: String,
    pub created_at: DateTime<Utc>,
}

impl From<GridArea> for GridAreaDto {
    fn from(area: GridArea) -> Self {
        Self {
            id: area.id,
            link_id: area.link_id.0,
            code: area.code.to_string(),
            name: area.name,
            price_area: area.price_area.name().to_string(),
            operator_gln: area.operator_gln.to_string(),
            created_at: area.created_at,
        }
    }
}
