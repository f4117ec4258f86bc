use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use std::collections::BTreeMap;

use super::CrudRepository;
use crate::entities::order_item::{Column, Entity as OrderItem, Model as OrderItemModel};
use crate::errors::ServiceError;

/// Units sold of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductQuantity {
    pub product_id: i64,
    pub quantity: i64,
}

/// Revenue earned by one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product_id: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderItemRepository {
    base: CrudRepository<OrderItem>,
}

entity_repository!(OrderItemRepository, OrderItem);

impl OrderItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of `order_id` in insertion order.
    pub async fn find_by_order<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        Ok(OrderItem::find()
            .filter(Column::OrderId.eq(order_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        Ok(OrderItem::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_order_and_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
        product_id: i64,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        Ok(OrderItem::find()
            .filter(Column::OrderId.eq(order_id))
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_quantity_at_least<C: ConnectionTrait>(
        &self,
        conn: &C,
        quantity: i32,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        Ok(OrderItem::find()
            .filter(Column::Quantity.gte(quantity))
            .all(conn)
            .await?)
    }

    pub async fn find_by_unit_price_at_least<C: ConnectionTrait>(
        &self,
        conn: &C,
        unit_price: Decimal,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        Ok(OrderItem::find()
            .filter(Column::UnitPrice.gte(unit_price))
            .all(conn)
            .await?)
    }

    /// Units of `product_id` across all order lines; 0 when never ordered.
    pub async fn total_quantity_sold<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<i64, ServiceError> {
        let total = OrderItem::find()
            .select_only()
            .column_as(Column::Quantity.sum(), "total")
            .filter(Column::ProductId.eq(product_id))
            .into_tuple::<Option<i64>>()
            .one(conn)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }

    /// Sum of line subtotals for `product_id`; 0 when never ordered.
    pub async fn total_revenue<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<Decimal, ServiceError> {
        let subtotals: Vec<Decimal> = OrderItem::find()
            .select_only()
            .column(Column::Subtotal)
            .filter(Column::ProductId.eq(product_id))
            .into_tuple()
            .all(conn)
            .await?;
        Ok(subtotals.into_iter().sum())
    }

    /// Best sellers by units, highest first, at most `limit` entries.
    /// Ties are broken by ascending product id.
    pub async fn top_selling_by_quantity<C: ConnectionTrait>(
        &self,
        conn: &C,
        limit: u64,
    ) -> Result<Vec<ProductQuantity>, ServiceError> {
        let rows: Vec<(i64, Option<i64>)> = OrderItem::find()
            .select_only()
            .column(Column::ProductId)
            .column_as(Column::Quantity.sum(), "total_quantity")
            .group_by(Column::ProductId)
            .order_by_desc(Column::Quantity.sum())
            .order_by_asc(Column::ProductId)
            .limit(limit)
            .into_tuple()
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, quantity)| ProductQuantity {
                product_id,
                quantity: quantity.unwrap_or(0),
            })
            .collect())
    }

    /// Best sellers by revenue, highest first, at most `limit` entries.
    /// Ties are broken by ascending product id.
    pub async fn top_selling_by_revenue<C: ConnectionTrait>(
        &self,
        conn: &C,
        limit: u64,
    ) -> Result<Vec<ProductRevenue>, ServiceError> {
        let rows: Vec<(i64, Decimal)> = OrderItem::find()
            .select_only()
            .column(Column::ProductId)
            .column(Column::Subtotal)
            .into_tuple()
            .all(conn)
            .await?;

        let mut by_product: BTreeMap<i64, Decimal> = BTreeMap::new();
        for (product_id, subtotal) in rows {
            *by_product.entry(product_id).or_default() += subtotal;
        }

        let mut ranked: Vec<ProductRevenue> = by_product
            .into_iter()
            .map(|(product_id, revenue)| ProductRevenue {
                product_id,
                revenue,
            })
            .collect();
        // stable sort keeps ascending product id among equal revenues
        ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(ranked)
    }
}
