#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use warehouse_inventory::{
    db::{self, DbConfig, DbPool},
    entities::{category, location, product},
    services::{ServiceContainer, ServiceFactory},
};

/// Helper harness backed by a fresh, migrated in-memory SQLite database.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub services: ServiceContainer,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db = Arc::new(pool);
        let services = ServiceContainer::new(&ServiceFactory::new(db.clone()));
        Self { db, services }
    }

    pub async fn category(&self, name: &str) -> category::Model {
        self.services
            .categories
            .save(category::Model::new(name))
            .await
            .expect("failed to create category")
    }

    pub async fn product(&self, name: &str, price: Decimal) -> product::Model {
        self.services
            .products
            .save(product::Model::new(name, price, None))
            .await
            .expect("failed to create product")
    }

    pub async fn location(&self, name: &str) -> location::Model {
        self.services
            .locations
            .save(location::Model::new(name))
            .await
            .expect("failed to create location")
    }
}
