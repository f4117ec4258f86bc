use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::CrudRepository;
use crate::db::query_builder::contains_ignore_case;
use crate::entities::product::{Column, Entity as Product, Model as ProductModel};
use crate::errors::ServiceError;

/// Repository for product operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRepository {
    base: CrudRepository<Product>,
}

entity_repository!(ProductRepository, Product);

impl ProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Products whose name contains `name`, ignoring case.
    pub async fn find_by_name_containing<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(contains_ignore_case(Column::Name, name))
            .order_by_asc(Column::Name)
            .all(conn)
            .await?)
    }

    pub async fn find_by_category<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: i64,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::CategoryId.eq(category_id))
            .all(conn)
            .await?)
    }

    pub async fn find_by_supplier<C: ConnectionTrait>(
        &self,
        conn: &C,
        supplier_id: i64,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::SupplierId.eq(supplier_id))
            .all(conn)
            .await?)
    }

    pub async fn find_by_price_at_most<C: ConnectionTrait>(
        &self,
        conn: &C,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::Price.lte(max_price))
            .order_by_asc(Column::Price)
            .all(conn)
            .await?)
    }

    pub async fn find_by_price_at_least<C: ConnectionTrait>(
        &self,
        conn: &C,
        min_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::Price.gte(min_price))
            .order_by_asc(Column::Price)
            .all(conn)
            .await?)
    }

    /// Inclusive on both ends.
    pub async fn find_by_price_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::Price.between(min_price, max_price))
            .order_by_asc(Column::Price)
            .all(conn)
            .await?)
    }

    pub async fn find_by_sku<C: ConnectionTrait>(
        &self,
        conn: &C,
        sku: &str,
    ) -> Result<Option<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::Sku.eq(sku))
            .one(conn)
            .await?)
    }

    /// Products whose name or description contains `term`, ignoring case.
    pub async fn search<C: ConnectionTrait>(
        &self,
        conn: &C,
        term: &str,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(
                Condition::any()
                    .add(contains_ignore_case(Column::Name, term))
                    .add(contains_ignore_case(Column::Description, term)),
            )
            .order_by_asc(Column::Name)
            .all(conn)
            .await?)
    }

    pub async fn find_by_category_and_max_price<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: i64,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(Column::CategoryId.eq(category_id))
            .filter(Column::Price.lte(max_price))
            .order_by_asc(Column::Price)
            .all(conn)
            .await?)
    }
}
