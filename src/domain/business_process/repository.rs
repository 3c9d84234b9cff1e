//! Business process repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::BusinessProcess;
use crate::domain::DomainResult;

#[async_trait]
pub trait BusinessProcessRepository: Send + Sync {
    async fn add(&self, process: &BusinessProcess) -> DomainResult<()>;
    async fn update(&self, process: &BusinessProcess) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<BusinessProcess>>;
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> DomainResult<Option<BusinessProcess>>;
    /// Processes for a GSRN, newest first.
    async fn list_for_gsrn(&self, gsrn: &str) -> DomainResult<Vec<BusinessProcess>>;
}
