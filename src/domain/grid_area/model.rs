//! Grid area domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enumerations::PriceAreaCode;
use crate::domain::values::{GlnNumber, GridAreaCode};

/// Stable reference from a metering point to the grid area it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridAreaLinkId(pub Uuid);

impl GridAreaLinkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GridAreaLinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GridAreaLinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network area operated by a single grid operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridArea {
    pub id: Uuid,
    pub link_id: GridAreaLinkId,
    pub code: GridAreaCode,
    pub name: String,
    pub price_area: PriceAreaCode,
    /// GLN of the grid operator responsible for the area
    pub operator_gln: GlnNumber,
    pub created_at: DateTime<Utc>,
}

impl GridArea {
    pub fn new(
        code: GridAreaCode,
        name: impl Into<String>,
        price_area: PriceAreaCode,
        operator_gln: GlnNumber,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            link_id: GridAreaLinkId::new(),
            code,
            name: name.into(),
            price_area,
            operator_gln,
            created_at: Utc::now(),
        }
    }

    pub fn is_operated_by(&self, gln: &GlnNumber) -> bool {
        &self.operator_gln == gln
    }
}
