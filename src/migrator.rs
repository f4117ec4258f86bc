use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_product_categories_table::Migration),
            Box::new(m20240101_000002_create_suppliers_table::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_locations_table::Migration),
            Box::new(m20240101_000005_create_inventory_items_table::Migration),
            Box::new(m20240101_000006_create_stock_movements_table::Migration),
            Box::new(m20240101_000007_create_orders_table::Migration),
            Box::new(m20240101_000008_create_order_items_table::Migration),
        ]
    }
}

/// Audit columns shared by every table.
#[derive(DeriveIden)]
enum Audit {
    CreatedBy,
    CreatedDate,
    LastModifiedBy,
    LastModifiedDate,
}

fn id_column<T: IntoIden>(id: T) -> ColumnDef {
    ColumnDef::new(id)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn with_audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Audit::CreatedBy).string_len(100).null())
        .col(
            ColumnDef::new(Audit::CreatedDate)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::LastModifiedBy).string_len(100).null())
        .col(
            ColumnDef::new(Audit::LastModifiedDate)
                .timestamp_with_time_zone()
                .null(),
        )
}

mod m20240101_000001_create_product_categories_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_product_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(ProductCategories::Table)
                .if_not_exists()
                .col(id_column(ProductCategories::Id))
                .col(
                    ColumnDef::new(ProductCategories::Name)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(ProductCategories::Description).string_len(500).null())
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductCategories {
        Table,
        Id,
        Name,
        Description,
    }
}

mod m20240101_000002_create_suppliers_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(Suppliers::Table)
                .if_not_exists()
                .col(id_column(Suppliers::Id))
                .col(ColumnDef::new(Suppliers::CompanyName).string_len(100).not_null())
                .col(ColumnDef::new(Suppliers::ContactName).string_len(100).not_null())
                .col(ColumnDef::new(Suppliers::Email).string_len(255).null().unique_key())
                .col(ColumnDef::new(Suppliers::Phone).string_len(20).null())
                .col(ColumnDef::new(Suppliers::Address).string_len(255).null())
                .col(ColumnDef::new(Suppliers::City).string_len(100).null())
                .col(ColumnDef::new(Suppliers::Country).string_len(100).null())
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        CompanyName,
        ContactName,
        Email,
        Phone,
        Address,
        City,
        Country,
    }
}

mod m20240101_000003_create_products_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(Products::Table)
                .if_not_exists()
                .col(id_column(Products::Id))
                .col(ColumnDef::new(Products::Name).string_len(100).not_null())
                .col(ColumnDef::new(Products::Description).string_len(1000).null())
                .col(ColumnDef::new(Products::Price).decimal_len(12, 2).not_null())
                .col(ColumnDef::new(Products::Sku).string_len(64).null().unique_key())
                .col(ColumnDef::new(Products::ImageUrl).string_len(500).null())
                .col(ColumnDef::new(Products::CategoryId).big_integer().null())
                .col(ColumnDef::new(Products::SupplierId).big_integer().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_products_category_id")
                        .from(Products::Table, Products::CategoryId)
                        .to(ProductCategories::Table, ProductCategories::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_products_supplier_id")
                        .from(Products::Table, Products::SupplierId)
                        .to(Suppliers::Table, Suppliers::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        Description,
        Price,
        Sku,
        ImageUrl,
        CategoryId,
        SupplierId,
    }

    #[derive(DeriveIden)]
    enum ProductCategories {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
    }
}

mod m20240101_000004_create_locations_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(Locations::Table)
                .if_not_exists()
                .col(id_column(Locations::Id))
                .col(
                    ColumnDef::new(Locations::Name)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Locations::Description).string_len(500).null())
                .col(ColumnDef::new(Locations::Zone).string_len(50).null())
                .col(ColumnDef::new(Locations::Aisle).string_len(50).null())
                .col(ColumnDef::new(Locations::Rack).string_len(50).null())
                .col(ColumnDef::new(Locations::Shelf).string_len(50).null())
                .col(ColumnDef::new(Locations::Bin).string_len(50).null())
                .col(
                    ColumnDef::new(Locations::Active)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
        Name,
        Description,
        Zone,
        Aisle,
        Rack,
        Shelf,
        Bin,
        Active,
    }
}

mod m20240101_000005_create_inventory_items_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(InventoryItems::Table)
                .if_not_exists()
                .col(id_column(InventoryItems::Id))
                .col(ColumnDef::new(InventoryItems::ProductId).big_integer().not_null())
                .col(ColumnDef::new(InventoryItems::LocationId).big_integer().not_null())
                .col(
                    ColumnDef::new(InventoryItems::Quantity)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .col(
                    ColumnDef::new(InventoryItems::MinStockLevel)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .col(
                    ColumnDef::new(InventoryItems::MaxStockLevel)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .col(
                    ColumnDef::new(InventoryItems::ReorderPoint)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_inventory_items_product_id")
                        .from(InventoryItems::Table, InventoryItems::ProductId)
                        .to(Products::Table, Products::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_inventory_items_location_id")
                        .from(InventoryItems::Table, InventoryItems::LocationId)
                        .to(Locations::Table, Locations::Id),
                )
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uk_inventory_items_product_location")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::ProductId)
                        .col(InventoryItems::LocationId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        ProductId,
        LocationId,
        Quantity,
        MinStockLevel,
        MaxStockLevel,
        ReorderPoint,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
    }
}

mod m20240101_000006_create_stock_movements_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_stock_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(StockMovements::Table)
                .if_not_exists()
                .col(id_column(StockMovements::Id))
                .col(ColumnDef::new(StockMovements::ProductId).big_integer().not_null())
                .col(ColumnDef::new(StockMovements::SourceLocationId).big_integer().null())
                .col(ColumnDef::new(StockMovements::TargetLocationId).big_integer().null())
                .col(ColumnDef::new(StockMovements::Quantity).integer().not_null())
                .col(ColumnDef::new(StockMovements::MovementType).string_len(32).not_null())
                .col(ColumnDef::new(StockMovements::ReferenceNumber).string_len(100).null())
                .col(ColumnDef::new(StockMovements::Notes).string_len(500).null())
                .col(
                    ColumnDef::new(StockMovements::MovementDate)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_stock_movements_product_id")
                        .from(StockMovements::Table, StockMovements::ProductId)
                        .to(Products::Table, Products::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_stock_movements_source_location_id")
                        .from(StockMovements::Table, StockMovements::SourceLocationId)
                        .to(Locations::Table, Locations::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_stock_movements_target_location_id")
                        .from(StockMovements::Table, StockMovements::TargetLocationId)
                        .to(Locations::Table, Locations::Id),
                )
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_product_date")
                        .table(StockMovements::Table)
                        .col(StockMovements::ProductId)
                        .col(StockMovements::MovementDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockMovements {
        Table,
        Id,
        ProductId,
        SourceLocationId,
        TargetLocationId,
        Quantity,
        MovementType,
        ReferenceNumber,
        Notes,
        MovementDate,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
    }
}

mod m20240101_000007_create_orders_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(Orders::Table)
                .if_not_exists()
                .col(id_column(Orders::Id))
                .col(
                    ColumnDef::new(Orders::OrderNumber)
                        .string_len(64)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(Orders::OrderDate)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(Orders::CustomerName).string_len(100).not_null())
                .col(ColumnDef::new(Orders::CustomerEmail).string_len(255).null())
                .col(ColumnDef::new(Orders::CustomerPhone).string_len(20).null())
                .col(ColumnDef::new(Orders::ShippingAddress).string_len(255).null())
                .col(ColumnDef::new(Orders::ShippingCity).string_len(100).null())
                .col(ColumnDef::new(Orders::ShippingCountry).string_len(100).null())
                .col(ColumnDef::new(Orders::ShippingPostalCode).string_len(20).null())
                .col(ColumnDef::new(Orders::ShippingMethod).string_len(50).null())
                .col(ColumnDef::new(Orders::PaymentMethod).string_len(50).null())
                .col(
                    ColumnDef::new(Orders::Subtotal)
                        .decimal_len(14, 2)
                        .not_null()
                        .default(0),
                )
                .col(ColumnDef::new(Orders::Tax).decimal_len(14, 2).null().default(0))
                .col(
                    ColumnDef::new(Orders::ShippingCost)
                        .decimal_len(14, 2)
                        .null()
                        .default(0),
                )
                .col(
                    ColumnDef::new(Orders::Total)
                        .decimal_len(14, 2)
                        .not_null()
                        .default(0),
                )
                .col(
                    ColumnDef::new(Orders::Status)
                        .string_len(32)
                        .not_null()
                        .default("PENDING"),
                )
                .col(ColumnDef::new(Orders::Notes).string_len(1000).null())
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status_order_date")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .col(Orders::OrderDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        OrderNumber,
        OrderDate,
        CustomerName,
        CustomerEmail,
        CustomerPhone,
        ShippingAddress,
        ShippingCity,
        ShippingCountry,
        ShippingPostalCode,
        ShippingMethod,
        PaymentMethod,
        Subtotal,
        Tax,
        ShippingCost,
        Total,
        Status,
        Notes,
    }
}

mod m20240101_000008_create_order_items_table {
    use super::{id_column, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_order_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(OrderItems::Table)
                .if_not_exists()
                .col(id_column(OrderItems::Id))
                .col(ColumnDef::new(OrderItems::OrderId).big_integer().not_null())
                .col(ColumnDef::new(OrderItems::ProductId).big_integer().not_null())
                .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                .col(ColumnDef::new(OrderItems::UnitPrice).decimal_len(12, 2).not_null())
                .col(
                    ColumnDef::new(OrderItems::Subtotal)
                        .decimal_len(14, 2)
                        .not_null()
                        .default(0),
                )
                .col(ColumnDef::new(OrderItems::Notes).string_len(500).null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_order_items_order_id")
                        .from(OrderItems::Table, OrderItems::OrderId)
                        .to(Orders::Table, Orders::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_order_items_product_id")
                        .from(OrderItems::Table, OrderItems::ProductId)
                        .to(Products::Table, Products::Id),
                )
                .to_owned();
            manager.create_table(with_audit_columns(&mut table).to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_product_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrderItems {
        Table,
        Id,
        OrderId,
        ProductId,
        Quantity,
        UnitPrice,
        Subtotal,
        Notes,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }
}
