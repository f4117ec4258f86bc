use std::sync::Arc;
use tracing::instrument;

use super::CrudService;
use crate::db::DbPool;
use crate::entities::category::Model as CategoryModel;
use crate::errors::ServiceError;
use crate::repositories::CategoryRepository;

/// Service for product categories
#[derive(Debug, Clone)]
pub struct CategoryService {
    crud: CrudService<CategoryRepository>,
}

entity_service!(CategoryService, CategoryRepository);

impl CategoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            crud: CrudService::new(db, CategoryRepository::new()),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_name_containing(
        &self,
        name: &str,
    ) -> Result<Vec<CategoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_name_containing(&txn, name))
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<CategoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_by_name(&txn, name))
    }

    #[instrument(skip(self))]
    pub async fn find_by_description_containing(
        &self,
        text: &str,
    ) -> Result<Vec<CategoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_description_containing(&txn, text))
    }
}
