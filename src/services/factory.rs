use std::sync::Arc;

use crate::{
    db::DbPool,
    repositories::{LocationRepository, SupplierRepository},
    services::{
        CategoryService, InventoryService, LocationService, OrderItemService, OrderService,
        ProductService, StockMovementService, SupplierService,
    },
};

/// Factory for creating service instances over a shared connection pool
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    db_pool: Arc<DbPool>,
}

impl ServiceFactory {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    pub fn category_service(&self) -> CategoryService {
        CategoryService::new(self.db_pool.clone())
    }

    pub fn supplier_service(&self) -> SupplierService {
        SupplierService::new(self.db_pool.clone(), SupplierRepository::new())
    }

    pub fn product_service(&self) -> ProductService {
        ProductService::new(self.db_pool.clone())
    }

    pub fn location_service(&self) -> LocationService {
        LocationService::new(self.db_pool.clone(), LocationRepository::new())
    }

    pub fn inventory_service(&self) -> InventoryService {
        InventoryService::new(self.db_pool.clone())
    }

    pub fn stock_movement_service(&self) -> StockMovementService {
        StockMovementService::new(self.db_pool.clone())
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.db_pool.clone())
    }

    pub fn order_item_service(&self) -> OrderItemService {
        OrderItemService::new(self.db_pool.clone())
    }

    /// Gets a reference to the database pool
    pub fn db_pool(&self) -> &Arc<DbPool> {
        &self.db_pool
    }
}

/// Service container holding all service instances
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub categories: Arc<CategoryService>,
    pub suppliers: Arc<SupplierService>,
    pub products: Arc<ProductService>,
    pub locations: Arc<LocationService>,
    pub inventory: Arc<InventoryService>,
    pub stock_movements: Arc<StockMovementService>,
    pub orders: Arc<OrderService>,
    pub order_items: Arc<OrderItemService>,
}

impl ServiceContainer {
    /// Creates a new service container with all services initialized
    pub fn new(factory: &ServiceFactory) -> Self {
        Self {
            categories: Arc::new(factory.category_service()),
            suppliers: Arc::new(factory.supplier_service()),
            products: Arc::new(factory.product_service()),
            locations: Arc::new(factory.location_service()),
            inventory: Arc::new(factory.inventory_service()),
            stock_movements: Arc::new(factory.stock_movement_service()),
            orders: Arc::new(factory.order_service()),
            order_items: Arc::new(factory.order_item_service()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use crate::entities::{category, location};

    #[tokio::test]
    async fn container_services_share_one_pool() {
        let pool = establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let container = ServiceContainer::new(&ServiceFactory::new(Arc::new(pool)));

        container
            .categories
            .save(category::Model::new("Fasteners"))
            .await
            .unwrap();
        container
            .locations
            .save(location::Model::new("Aisle 1"))
            .await
            .unwrap();

        assert_eq!(container.categories.count().await.unwrap(), 1);
        assert_eq!(container.locations.count().await.unwrap(), 1);
        assert_eq!(container.products.count().await.unwrap(), 0);
    }
}
