//! Transactional service layer.
//!
//! Every public service operation runs in exactly one database transaction:
//! writes commit on success and roll back on error, reads run read-only on
//! backends that support it.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, PrimaryKeyTrait, Value,
};
use std::sync::Arc;
use tracing::debug;

use crate::db::{DbPool, Specification};
use crate::entities::Persistable;
use crate::errors::ServiceError;
use crate::repositories::Repository;

/// Runs `$body`, an expression over `&$txn`, in a read-only transaction.
macro_rules! read_txn {
    ($db:expr, |$txn:ident| $body:expr) => {{
        let $txn = $crate::db::begin_read_only($db).await?;
        let result = $body.await;
        $crate::db::finish($txn, result).await
    }};
}

/// Runs `$body`, an expression over `&$txn`, in a read-write transaction.
macro_rules! write_txn {
    ($db:expr, |$txn:ident| $body:expr) => {{
        let $txn = $crate::db::begin($db).await?;
        let result = $body.await;
        $crate::db::finish($txn, result).await
    }};
}

/// Generates `Deref` to the generic service for an entity-specific service
/// with a `crud` field.
macro_rules! entity_service {
    ($service:ident, $repo:ty) => {
        impl std::ops::Deref for $service {
            type Target = $crate::services::CrudService<$repo>;

            fn deref(&self) -> &Self::Target {
                &self.crud
            }
        }
    };
}

pub mod categories;
pub mod factory;
pub mod inventory;
pub mod locations;
pub mod order_items;
pub mod orders;
pub mod product_service;
pub mod stock_movements;
pub mod suppliers;

pub use categories::CategoryService;
pub use factory::{ServiceContainer, ServiceFactory};
pub use inventory::InventoryService;
pub use locations::LocationService;
pub use order_items::OrderItemService;
pub use orders::OrderService;
pub use product_service::ProductService;
pub use stock_movements::StockMovementService;
pub use suppliers::SupplierService;

/// Model type handled by repository `R`.
pub type ModelOf<R> = <<R as Repository>::Entity as EntityTrait>::Model;

/// Transactional wrapper around a repository, exposing the generic CRUD
/// operations.
#[derive(Debug, Clone)]
pub struct CrudService<R> {
    db: Arc<DbPool>,
    repo: R,
}

impl<R: Repository> CrudService<R> {
    pub fn new(db: Arc<DbPool>, repo: R) -> Self {
        Self { db, repo }
    }

    pub fn db(&self) -> &DbPool {
        &self.db
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl<R, E> CrudService<R>
where
    R: Repository<Entity = E>,
    E: EntityTrait,
    E::Model: Persistable + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    pub async fn save(&self, model: ModelOf<R>) -> Result<ModelOf<R>, ServiceError> {
        debug!(entity = E::Model::NAME, id = model.id(), "Saving");
        write_txn!(&self.db, |txn| self.repo.base().save(&txn, model))
    }

    /// Saves all models in one transaction; nothing is written if any fails.
    pub async fn save_all(&self, models: Vec<ModelOf<R>>) -> Result<Vec<ModelOf<R>>, ServiceError> {
        debug!(entity = E::Model::NAME, count = models.len(), "Saving batch");
        write_txn!(&self.db, |txn| self.repo.base().save_all(&txn, models))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ModelOf<R>>, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().find_by_id(&txn, id))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ModelOf<R>, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().get_by_id(&txn, id))
    }

    pub async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().exists_by_id(&txn, id))
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().count(&txn))
    }

    pub async fn find_all(&self) -> Result<Vec<ModelOf<R>>, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().find_all(&txn))
    }

    pub async fn find_all_sorted(&self, field: &str) -> Result<Vec<ModelOf<R>>, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().find_all_sorted(&txn, field))
    }

    pub async fn find_by_field<V>(
        &self,
        field: &str,
        value: V,
    ) -> Result<Vec<ModelOf<R>>, ServiceError>
    where
        V: Into<Value>,
    {
        read_txn!(&self.db, |txn| self.repo.base().find_by_field(&txn, field, value))
    }

    pub async fn find_one_by_field<V>(
        &self,
        field: &str,
        value: V,
    ) -> Result<Option<ModelOf<R>>, ServiceError>
    where
        V: Into<Value>,
    {
        read_txn!(&self.db, |txn| self
            .repo
            .base()
            .find_one_by_field(&txn, field, value))
    }

    pub async fn delete(&self, model: &ModelOf<R>) -> Result<(), ServiceError> {
        debug!(entity = E::Model::NAME, id = model.id(), "Deleting");
        write_txn!(&self.db, |txn| self.repo.base().delete(&txn, model))
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        debug!(entity = E::Model::NAME, id, "Deleting");
        write_txn!(&self.db, |txn| self.repo.base().delete_by_id(&txn, id))
    }

    pub async fn find_all_matching(
        &self,
        spec: &Specification,
    ) -> Result<Vec<ModelOf<R>>, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().find_all_matching(&txn, spec))
    }

    pub async fn find_one_matching(
        &self,
        spec: &Specification,
    ) -> Result<Option<ModelOf<R>>, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().find_one_matching(&txn, spec))
    }

    pub async fn count_matching(&self, spec: &Specification) -> Result<u64, ServiceError> {
        read_txn!(&self.db, |txn| self.repo.base().count_matching(&txn, spec))
    }
}
