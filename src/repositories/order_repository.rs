use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Query, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::CrudRepository;
use crate::db::query_builder::contains_ignore_case;
use crate::entities::order::{
    Column, Entity as Order, Model as OrderModel, OrderStatus, OrderWithItems,
};
use crate::entities::order_item;
use crate::errors::ServiceError;

/// Repository for order operations
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderRepository {
    base: CrudRepository<Order>,
}

entity_repository!(OrderRepository, Order);

impl OrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_order_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_number: &str,
    ) -> Result<Option<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::OrderNumber.eq(order_number))
            .one(conn)
            .await?)
    }

    pub async fn find_by_customer_name_containing<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(contains_ignore_case(Column::CustomerName, name))
            .order_by_desc(Column::OrderDate)
            .all(conn)
            .await?)
    }

    pub async fn find_by_customer_email<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::CustomerEmail.eq(email))
            .order_by_desc(Column::OrderDate)
            .all(conn)
            .await?)
    }

    pub async fn find_by_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        status: OrderStatus,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::Status.eq(status))
            .order_by_desc(Column::OrderDate)
            .all(conn)
            .await?)
    }

    /// Orders placed within `[start, end]`.
    pub async fn find_by_date_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::OrderDate.between(start, end))
            .order_by_asc(Column::OrderDate)
            .all(conn)
            .await?)
    }

    pub async fn find_by_total_at_least<C: ConnectionTrait>(
        &self,
        conn: &C,
        total: Decimal,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::Total.gte(total))
            .order_by_asc(Column::Total)
            .all(conn)
            .await?)
    }

    pub async fn find_by_total_at_most<C: ConnectionTrait>(
        &self,
        conn: &C,
        total: Decimal,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::Total.lte(total))
            .order_by_asc(Column::Total)
            .all(conn)
            .await?)
    }

    pub async fn find_by_status_and_date_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        status: OrderStatus,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::Status.eq(status))
            .filter(Column::OrderDate.between(start, end))
            .order_by_asc(Column::OrderDate)
            .all(conn)
            .await?)
    }

    /// Orders with at least one line for `product_id`, each listed once.
    pub async fn find_orders_containing_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        let order_ids = Query::select()
            .column(order_item::Column::OrderId)
            .from(order_item::Entity)
            .and_where(order_item::Column::ProductId.eq(product_id))
            .to_owned();

        Ok(Order::find()
            .filter(Column::Id.in_subquery(order_ids))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    /// Sum of order totals within `[start, end]`, ignoring cancelled orders; 0 when none.
    pub async fn total_sales_for_date_range<C: ConnectionTrait>(
        &self,
        conn: &C,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, ServiceError> {
        // summed here rather than in SQL so the result stays exact on every backend
        let totals: Vec<Decimal> = Order::find()
            .select_only()
            .column(Column::Total)
            .filter(Column::OrderDate.between(start, end))
            .filter(Column::Status.ne(OrderStatus::Cancelled))
            .into_tuple()
            .all(conn)
            .await?;
        Ok(totals.into_iter().sum())
    }

    pub async fn count_by_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        status: OrderStatus,
    ) -> Result<u64, ServiceError> {
        Ok(Order::find()
            .filter(Column::Status.eq(status))
            .count(conn)
            .await?)
    }

    /// Loads an order and its lines in insertion order.
    pub async fn find_with_items<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
    ) -> Result<Option<OrderWithItems>, ServiceError> {
        let Some(order) = Order::find_by_id(order_id).one(conn).await? else {
            return Ok(None);
        };

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Id)
            .all(conn)
            .await?;

        Ok(Some(OrderWithItems { order, items }))
    }
}
