//! Grid area registration and lookup

use std::sync::Arc;

use tracing::info;

use crate::application::market::{validate_input, CreateGridArea};
use crate::domain::enumerations::PriceAreaCode;
use crate::domain::metering_point::master_data::parse_enum;
use crate::domain::values::{GlnNumber, GridAreaCode};
use crate::domain::{DomainError, DomainResult, GridArea, RepositoryProvider};

pub struct GridAreaService {
    repos: Arc<dyn RepositoryProvider>,
}

impl GridAreaService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_grid_area(&self, request: CreateGridArea) -> DomainResult<GridArea> {
        let mut errors = validate_input(&request);
        if !errors.is_empty() {
            return Err(DomainError::BusinessRules(errors));
        }

        let code = GridAreaCode::create(&request.code).map_err(|e| errors.push(e)).ok();
        let price_area = parse_enum::<PriceAreaCode>(&request.price_area)
            .map_err(|e| errors.push(e))
            .ok();
        let operator_gln = GlnNumber::create(&request.operator_gln)
            .map_err(|e| errors.push(e))
            .ok();

        let (Some(code), Some(price_area), Some(operator_gln)) = (code, price_area, operator_gln)
        else {
            return Err(DomainError::BusinessRules(errors));
        };

        if self.repos.grid_areas().find_by_code(&code).await?.is_some() {
            return Err(DomainError::Conflict(format!("Grid area {} already exists", code)));
        }

        let grid_area = GridArea::new(code, request.name.trim(), price_area, operator_gln);
        self.repos.grid_areas().add(&grid_area).await?;

        info!(
            code = %grid_area.code,
            operator = %grid_area.operator_gln,
            link_id = %grid_area.link_id,
            "Grid area created"
        );
        Ok(grid_area)
    }

    pub async fn list(&self) -> DomainResult<Vec<GridArea>> {
        self.repos.grid_areas().list().await
    }
}
