use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::CrudRepository;
use crate::db::query_builder::{contains_ignore_case, equals_ignore_case};
use crate::entities::category::{Column, Entity as Category, Model as CategoryModel};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRepository {
    base: CrudRepository<Category>,
}

entity_repository!(CategoryRepository, Category);

impl CategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_name_containing<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<Vec<CategoryModel>, ServiceError> {
        Ok(Category::find()
            .filter(contains_ignore_case(Column::Name, name))
            .order_by_asc(Column::Name)
            .all(conn)
            .await?)
    }

    /// Exact name match, ignoring case.
    pub async fn find_by_name<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<Option<CategoryModel>, ServiceError> {
        Ok(Category::find()
            .filter(equals_ignore_case(Column::Name, name))
            .one(conn)
            .await?)
    }

    pub async fn find_by_description_containing<C: ConnectionTrait>(
        &self,
        conn: &C,
        text: &str,
    ) -> Result<Vec<CategoryModel>, ServiceError> {
        Ok(Category::find()
            .filter(contains_ignore_case(Column::Description, text))
            .order_by_asc(Column::Name)
            .all(conn)
            .await?)
    }
}
