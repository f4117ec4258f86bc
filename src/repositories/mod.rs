//! Data access layer.
//!
//! Repositories are stateless: every operation takes the connection or open
//! transaction it should run on, so a service can compose several repository
//! calls inside one transaction.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    Iterable, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, Value,
};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;
use validator::Validate;

use crate::db::query_builder::{resolve_column, Specification};
use crate::entities::Persistable;
use crate::errors::ServiceError;

/// Generates the `Repository` impl and `Deref` to the generic repository for
/// an entity-specific repository with a `base` field.
macro_rules! entity_repository {
    ($repo:ident, $entity:ty) => {
        impl $crate::repositories::Repository for $repo {
            type Entity = $entity;

            fn base(&self) -> &$crate::repositories::CrudRepository<$entity> {
                &self.base
            }
        }

        impl std::ops::Deref for $repo {
            type Target = $crate::repositories::CrudRepository<$entity>;

            fn deref(&self) -> &Self::Target {
                &self.base
            }
        }
    };
}

pub mod category_repository;
pub mod inventory_repository;
pub mod order_item_repository;
pub mod order_repository;
pub mod product_repository;
pub mod stock_movement_repository;

pub use category_repository::CategoryRepository;
pub use inventory_repository::InventoryRepository;
pub use order_item_repository::{OrderItemRepository, ProductQuantity, ProductRevenue};
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use stock_movement_repository::StockMovementRepository;

pub type SupplierRepository = CrudRepository<crate::entities::Supplier>;
pub type LocationRepository = CrudRepository<crate::entities::Location>;

/// Repository trait implemented by the generic repository and every
/// entity-specific repository built on top of it.
pub trait Repository: Clone + Send + Sync + 'static {
    type Entity: EntityTrait;

    fn base(&self) -> &CrudRepository<Self::Entity>;
}

/// Generic CRUD, sorting, dynamic field lookup and specification queries for `E`.
pub struct CrudRepository<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> CrudRepository<E> {
    pub const fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for CrudRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for CrudRepository<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for CrudRepository<E> {}

impl<E> fmt::Debug for CrudRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudRepository")
            .field("entity", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: EntityTrait> Repository for CrudRepository<E> {
    type Entity = E;

    fn base(&self) -> &CrudRepository<E> {
        self
    }
}

impl<E> CrudRepository<E>
where
    E: EntityTrait,
    E::Model: Persistable + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    /// Validates and writes `model`: inserts when it has no id yet, updates otherwise.
    pub async fn save<C>(&self, conn: &C, mut model: E::Model) -> Result<E::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        model.prepare();
        model.validate()?;

        let id = model.id();
        let is_new = model.is_new();
        let mut active: E::ActiveModel = model.into_active_model().reset_all();

        if is_new {
            let pk = E::PrimaryKey::iter().next().ok_or_else(|| {
                ServiceError::InvalidInput(format!("{} has no primary key", E::Model::NAME))
            })?;
            active.not_set(pk.into_column());
            let saved = active.insert(conn).await?;
            debug!(entity = E::Model::NAME, id = saved.id(), "Inserted");
            Ok(saved)
        } else {
            match active.update(conn).await {
                Ok(saved) => {
                    debug!(entity = E::Model::NAME, id, "Updated");
                    Ok(saved)
                }
                Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
                    Err(ServiceError::not_found(E::Model::NAME, id))
                }
                Err(err) => Err(err.into()),
            }
        }
    }

    /// Saves each model in order, stopping at the first failure.
    pub async fn save_all<C, I>(&self, conn: &C, models: I) -> Result<Vec<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
        I: IntoIterator<Item = E::Model>,
    {
        let mut saved = Vec::new();
        for model in models {
            saved.push(self.save(conn, model).await?);
        }
        Ok(saved)
    }

    pub async fn find_by_id<C>(&self, conn: &C, id: i64) -> Result<Option<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Ok(E::find_by_id(id).one(conn).await?)
    }

    /// Like [`Self::find_by_id`] but a missing row is a not-found error.
    pub async fn get_by_id<C>(&self, conn: &C, id: i64) -> Result<E::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(E::Model::NAME, id))
    }

    pub async fn exists_by_id<C>(&self, conn: &C, id: i64) -> Result<bool, ServiceError>
    where
        C: ConnectionTrait,
    {
        Ok(E::find_by_id(id).count(conn).await? > 0)
    }

    pub async fn count<C>(&self, conn: &C) -> Result<u64, ServiceError>
    where
        C: ConnectionTrait,
    {
        Ok(E::find().count(conn).await?)
    }

    pub async fn find_all<C>(&self, conn: &C) -> Result<Vec<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Ok(E::find().all(conn).await?)
    }

    /// All rows ordered ascending by `field`.
    pub async fn find_all_sorted<C>(
        &self,
        conn: &C,
        field: &str,
    ) -> Result<Vec<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let column = resolve_column::<E>(field)?;
        Ok(E::find().order_by_asc(column).all(conn).await?)
    }

    pub async fn find_by_field<C, V>(
        &self,
        conn: &C,
        field: &str,
        value: V,
    ) -> Result<Vec<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
        V: Into<Value>,
    {
        self.find_all_matching(conn, &Specification::field_equals(field, value))
            .await
    }

    pub async fn find_one_by_field<C, V>(
        &self,
        conn: &C,
        field: &str,
        value: V,
    ) -> Result<Option<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
        V: Into<Value>,
    {
        self.find_one_matching(conn, &Specification::field_equals(field, value))
            .await
    }

    pub async fn delete<C>(&self, conn: &C, model: &E::Model) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        self.delete_by_id(conn, model.id()).await
    }

    /// Deletes the row with `id`; a missing row is a not-found error.
    pub async fn delete_by_id<C>(&self, conn: &C, id: i64) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let result = E::delete_by_id(id).exec(conn).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(E::Model::NAME, id));
        }
        debug!(entity = E::Model::NAME, id, "Deleted");
        Ok(())
    }

    pub async fn find_all_matching<C>(
        &self,
        conn: &C,
        spec: &Specification,
    ) -> Result<Vec<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let condition = spec.to_condition::<E>()?;
        Ok(E::find().filter(condition).all(conn).await?)
    }

    /// First row matching `spec`, if any.
    pub async fn find_one_matching<C>(
        &self,
        conn: &C,
        spec: &Specification,
    ) -> Result<Option<E::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let condition = spec.to_condition::<E>()?;
        Ok(E::find().filter(condition).one(conn).await?)
    }

    pub async fn count_matching<C>(&self, conn: &C, spec: &Specification) -> Result<u64, ServiceError>
    where
        C: ConnectionTrait,
    {
        let condition = spec.to_condition::<E>()?;
        Ok(E::find().filter(condition).count(conn).await?)
    }
}
