//! SeaORM implementation of GridAreaRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::enumerations::PriceAreaCode;
use crate::domain::grid_area::{GridArea, GridAreaLinkId, GridAreaRepository};
use crate::domain::values::{GlnNumber, GridAreaCode};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::grid_area;

use super::{corrupt, db_err, parse_uuid};

pub struct SeaOrmGridAreaRepository {
    db: DatabaseConnection,
}

impl SeaOrmGridAreaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn from_model(model: grid_area::Model) -> DomainResult<GridArea> {
    Ok(GridArea {
        id: parse_uuid(&model.id)?,
        link_id: GridAreaLinkId(parse_uuid(&model.link_id)?),
        code: GridAreaCode::create(&model.code).map_err(|e| corrupt(&model.code, e))?,
        price_area: PriceAreaCode::from_name(&model.price_area)
            .map_err(|e| corrupt(&model.code, e))?,
        operator_gln: GlnNumber::create(&model.operator_gln)
            .map_err(|e| corrupt(&model.code, e))?,
        name: model.name,
        created_at: model.created_at,
    })
}

#[async_trait]
impl GridAreaRepository for SeaOrmGridAreaRepository {
    async fn add(&self, grid_area: &GridArea) -> DomainResult<()> {
        debug!(code = %grid_area.code, "Saving grid area");

        if self.find_by_code(&grid_area.code).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Grid area {} already exists",
                grid_area.code
            )));
        }

        let model = grid_area::ActiveModel {
            id: Set(grid_area.id.to_string()),
            link_id: Set(grid_area.link_id.to_string()),
            code: Set(grid_area.code.to_string()),
            name: Set(grid_area.name.clone()),
            price_area: Set(grid_area.price_area.name().to_string()),
            operator_gln: Set(grid_area.operator_gln.to_string()),
            created_at: Set(grid_area.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_link_id(&self, link_id: GridAreaLinkId) -> DomainResult<Option<GridArea>> {
        grid_area::Entity::find()
            .filter(grid_area::Column::LinkId.eq(link_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn find_by_code(&self, code: &GridAreaCode) -> DomainResult<Option<GridArea>> {
        grid_area::Entity::find()
            .filter(grid_area::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn list(&self) -> DomainResult<Vec<GridArea>> {
        grid_area::Entity::find()
            .order_by_asc(grid_area::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(from_model)
            .collect()
    }
}
