//! SeaORM implementation of BusinessProcessRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::debug;

use crate::domain::business_process::BusinessProcessRepository;
use crate::domain::{
    BusinessProcess, BusinessProcessStatus, BusinessProcessType, DomainError, DomainResult,
};
use crate::infrastructure::database::entities::business_process;
use crate::shared::errors::InfraError;

use super::{corrupt, db_err, parse_uuid};

pub struct SeaOrmBusinessProcessRepository {
    db: DatabaseConnection,
}

impl SeaOrmBusinessProcessRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(process: &BusinessProcess) -> DomainResult<business_process::ActiveModel> {
    let errors = serde_json::to_string(&process.errors).map_err(InfraError::from)?;
    Ok(business_process::ActiveModel {
        id: Set(process.id.to_string()),
        transaction_id: Set(process.transaction_id.clone()),
        process_type: Set(process.process_type.as_str().to_string()),
        gsrn: Set(process.gsrn.clone()),
        status: Set(process.status.as_str().to_string()),
        errors: Set(errors),
        created_at: Set(process.created_at),
        completed_at: Set(process.completed_at),
    })
}

fn from_model(model: business_process::Model) -> DomainResult<BusinessProcess> {
    let process_type = model
        .process_type
        .parse::<BusinessProcessType>()
        .map_err(|e| corrupt(&model.transaction_id, e))?;
    let status = model
        .status
        .parse::<BusinessProcessStatus>()
        .map_err(|e| corrupt(&model.transaction_id, e))?;
    let errors = serde_json::from_str(&model.errors).map_err(InfraError::from)?;

    Ok(BusinessProcess {
        id: parse_uuid(&model.id)?,
        transaction_id: model.transaction_id,
        process_type,
        gsrn: model.gsrn,
        status,
        errors,
        created_at: model.created_at,
        completed_at: model.completed_at,
    })
}

#[async_trait]
impl BusinessProcessRepository for SeaOrmBusinessProcessRepository {
    async fn add(&self, process: &BusinessProcess) -> DomainResult<()> {
        debug!(transaction_id = %process.transaction_id, "Saving business process");

        if self
            .find_by_transaction_id(&process.transaction_id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Transaction {} already exists",
                process.transaction_id
            )));
        }
        to_active_model(process)?
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(format!(
                    "Transaction {} already exists",
                    process.transaction_id
                )),
                _ => db_err(e),
            })?;
        Ok(())
    }

    async fn update(&self, process: &BusinessProcess) -> DomainResult<()> {
        let existing = business_process::Entity::find_by_id(process.id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "BusinessProcess",
                field: "id",
                value: process.id.to_string(),
            });
        }
        to_active_model(process)?
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: uuid::Uuid) -> DomainResult<Option<BusinessProcess>> {
        business_process::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> DomainResult<Option<BusinessProcess>> {
        business_process::Entity::find()
            .filter(business_process::Column::TransactionId.eq(transaction_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn list_for_gsrn(&self, gsrn: &str) -> DomainResult<Vec<BusinessProcess>> {
        business_process::Entity::find()
            .filter(business_process::Column::Gsrn.eq(gsrn))
            .order_by_desc(business_process::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(from_model)
            .collect()
    }
}
