use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use super::CrudService;
use crate::db::DbPool;
use crate::entities::product::Model as ProductModel;
use crate::errors::ServiceError;
use crate::repositories::ProductRepository;

/// Product catalogue service
#[derive(Debug, Clone)]
pub struct ProductService {
    crud: CrudService<ProductRepository>,
}

entity_service!(ProductService, ProductRepository);

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            crud: CrudService::new(db, ProductRepository::new()),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_name_containing(
        &self,
        name: &str,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_name_containing(&txn, name))
    }

    #[instrument(skip(self))]
    pub async fn find_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_category(&txn, category_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_supplier(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_supplier(&txn, supplier_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_price_at_most(
        &self,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_price_at_most(&txn, max_price))
    }

    #[instrument(skip(self))]
    pub async fn find_by_price_at_least(
        &self,
        min_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_price_at_least(&txn, min_price))
    }

    #[instrument(skip(self))]
    pub async fn find_by_price_between(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_price_between(&txn, min_price, max_price))
    }

    #[instrument(skip(self))]
    pub async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_by_sku(&txn, sku))
    }

    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().search(&txn, term))
    }

    #[instrument(skip(self))]
    pub async fn find_by_category_and_max_price(
        &self,
        category_id: i64,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_category_and_max_price(&txn, category_id, max_price))
    }
}
