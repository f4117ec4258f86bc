//! Stock levels and the operations that change them.
//!
//! Every stock change is written together with its [`MovementType`] ledger
//! entry in one transaction, so the ledger never disagrees with the levels.

use metrics::counter;
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use tracing::{info, instrument};

use super::CrudService;
use crate::db::DbPool;
use crate::entities::inventory_item::Model as InventoryModel;
use crate::entities::stock_movement::{Model as MovementModel, MovementType};
use crate::entities::Persistable;
use crate::errors::ServiceError;
use crate::repositories::{
    InventoryRepository, LocationRepository, ProductRepository, StockMovementRepository,
};

/// Service for managing inventory
#[derive(Debug, Clone)]
pub struct InventoryService {
    crud: CrudService<InventoryRepository>,
    movements: StockMovementRepository,
    products: ProductRepository,
    locations: LocationRepository,
}

entity_service!(InventoryService, InventoryRepository);

fn ensure_positive(quantity: i32) -> Result<(), ServiceError> {
    if quantity <= 0 {
        return Err(ServiceError::InvalidArgument(format!(
            "Quantity must be positive, got {}",
            quantity
        )));
    }
    Ok(())
}

fn no_stock_record(product_id: i64, location_id: i64) -> ServiceError {
    ServiceError::NotFound(format!(
        "No inventory for product {} at location {}",
        product_id, location_id
    ))
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            crud: CrudService::new(db, InventoryRepository::new()),
            movements: StockMovementRepository::new(),
            products: ProductRepository::new(),
            locations: LocationRepository::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_product(&self, product_id: i64) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_product(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_location(
        &self,
        location_id: i64,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_location(&txn, location_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_product_and_location(
        &self,
        product_id: i64,
        location_id: i64,
    ) -> Result<Option<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_product_and_location(&txn, product_id, location_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_quantity_below(
        &self,
        threshold: i32,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_quantity_below(&txn, threshold))
    }

    #[instrument(skip(self))]
    pub async fn find_by_quantity_at_least(
        &self,
        threshold: i32,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_quantity_at_least(&txn, threshold))
    }

    #[instrument(skip(self))]
    pub async fn find_items_needing_reorder(&self) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_items_needing_reorder(&txn))
    }

    #[instrument(skip(self))]
    pub async fn total_quantity_by_product(&self, product_id: i64) -> Result<i64, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .total_quantity_by_product(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn find_low_stock(&self) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_low_stock(&txn))
    }

    #[instrument(skip(self))]
    pub async fn find_overstocked(&self) -> Result<Vec<InventoryModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_overstocked(&txn))
    }

    /// Books `quantity` units into `location_id`, creating the stock record if
    /// the product was not held there yet.
    #[instrument(skip(self))]
    pub async fn receive_stock(
        &self,
        product_id: i64,
        location_id: i64,
        quantity: i32,
        reference_number: Option<String>,
    ) -> Result<InventoryModel, ServiceError> {
        ensure_positive(quantity)?;
        let item = write_txn!(self.db(), |txn| self.receive_in(
            &txn,
            product_id,
            location_id,
            quantity,
            reference_number
        ))?;
        info!(product_id, location_id, quantity, on_hand = item.quantity, "Stock received");
        Ok(item)
    }

    /// Takes `quantity` units out of `location_id`.
    #[instrument(skip(self))]
    pub async fn ship_stock(
        &self,
        product_id: i64,
        location_id: i64,
        quantity: i32,
        reference_number: Option<String>,
    ) -> Result<InventoryModel, ServiceError> {
        ensure_positive(quantity)?;
        let item = write_txn!(self.db(), |txn| self.ship_in(
            &txn,
            product_id,
            location_id,
            quantity,
            reference_number
        ))?;
        info!(product_id, location_id, quantity, on_hand = item.quantity, "Stock shipped");
        Ok(item)
    }

    /// Sets the on-hand quantity after a count. The ledger records the size of
    /// the correction; nothing is recorded when the quantity is unchanged.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        product_id: i64,
        location_id: i64,
        new_quantity: i32,
        notes: Option<String>,
    ) -> Result<InventoryModel, ServiceError> {
        if new_quantity < 0 {
            return Err(ServiceError::InvalidArgument(format!(
                "Quantity cannot be negative, got {}",
                new_quantity
            )));
        }
        let item = write_txn!(self.db(), |txn| self.adjust_in(
            &txn,
            product_id,
            location_id,
            new_quantity,
            notes
        ))?;
        info!(product_id, location_id, on_hand = item.quantity, "Stock adjusted");
        Ok(item)
    }

    /// Moves `quantity` units between two locations. Returns the source and
    /// target stock records.
    #[instrument(skip(self))]
    pub async fn transfer_stock(
        &self,
        product_id: i64,
        from_location_id: i64,
        to_location_id: i64,
        quantity: i32,
        reference_number: Option<String>,
    ) -> Result<(InventoryModel, InventoryModel), ServiceError> {
        ensure_positive(quantity)?;
        if from_location_id == to_location_id {
            return Err(ServiceError::InvalidArgument(
                "Source and target location must differ".to_string(),
            ));
        }
        let (source, target) = write_txn!(self.db(), |txn| self.transfer_in(
            &txn,
            product_id,
            from_location_id,
            to_location_id,
            quantity,
            reference_number
        ))?;
        info!(
            product_id,
            from_location_id,
            to_location_id,
            quantity,
            "Stock transferred"
        );
        Ok((source, target))
    }

    async fn receive_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        location_id: i64,
        quantity: i32,
        reference_number: Option<String>,
    ) -> Result<InventoryModel, ServiceError> {
        let mut item = self.load_or_create(conn, product_id, location_id).await?;
        item.add_quantity(quantity)?;
        let item = self.repository().save(conn, item).await?;

        let movement = MovementModel::new(
            product_id,
            None,
            Some(location_id),
            quantity,
            MovementType::StockIn,
        )
        .with_reference(reference_number);
        self.record(conn, movement).await?;
        Ok(item)
    }

    async fn ship_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        location_id: i64,
        quantity: i32,
        reference_number: Option<String>,
    ) -> Result<InventoryModel, ServiceError> {
        let mut item = self
            .repository()
            .find_by_product_and_location(conn, product_id, location_id)
            .await?
            .ok_or_else(|| no_stock_record(product_id, location_id))?;
        item.remove_quantity(quantity)?;
        let item = self.repository().save(conn, item).await?;

        let movement = MovementModel::new(
            product_id,
            Some(location_id),
            None,
            quantity,
            MovementType::StockOut,
        )
        .with_reference(reference_number);
        self.record(conn, movement).await?;
        Ok(item)
    }

    async fn adjust_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        location_id: i64,
        new_quantity: i32,
        notes: Option<String>,
    ) -> Result<InventoryModel, ServiceError> {
        let mut item = self.load_or_create(conn, product_id, location_id).await?;
        let delta = new_quantity - item.quantity;
        if delta == 0 && !item.is_new() {
            return Ok(item);
        }

        item.quantity = new_quantity;
        let item = self.repository().save(conn, item).await?;
        if delta == 0 {
            return Ok(item);
        }

        let (source, target) = if delta > 0 {
            (None, Some(location_id))
        } else {
            (Some(location_id), None)
        };
        let movement = MovementModel::new(
            product_id,
            source,
            target,
            delta.abs(),
            MovementType::Adjustment,
        )
        .with_notes(notes);
        self.record(conn, movement).await?;
        Ok(item)
    }

    async fn transfer_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        from_location_id: i64,
        to_location_id: i64,
        quantity: i32,
        reference_number: Option<String>,
    ) -> Result<(InventoryModel, InventoryModel), ServiceError> {
        let mut source = self
            .repository()
            .find_by_product_and_location(conn, product_id, from_location_id)
            .await?
            .ok_or_else(|| no_stock_record(product_id, from_location_id))?;
        source.remove_quantity(quantity)?;

        let mut target = self
            .load_or_create(conn, product_id, to_location_id)
            .await?;
        target.add_quantity(quantity)?;

        let source = self.repository().save(conn, source).await?;
        let target = self.repository().save(conn, target).await?;

        let movement = MovementModel::new(
            product_id,
            Some(from_location_id),
            Some(to_location_id),
            quantity,
            MovementType::Transfer,
        )
        .with_reference(reference_number);
        self.record(conn, movement).await?;
        Ok((source, target))
    }

    /// Existing stock record, or an unsaved empty one after checking that both
    /// the product and the location exist.
    async fn load_or_create<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        location_id: i64,
    ) -> Result<InventoryModel, ServiceError> {
        if let Some(item) = self
            .repository()
            .find_by_product_and_location(conn, product_id, location_id)
            .await?
        {
            return Ok(item);
        }
        self.products.get_by_id(conn, product_id).await?;
        self.locations.get_by_id(conn, location_id).await?;
        Ok(InventoryModel::new(product_id, location_id, 0))
    }

    async fn record<C: ConnectionTrait>(
        &self,
        conn: &C,
        movement: MovementModel,
    ) -> Result<MovementModel, ServiceError> {
        let movement = self.movements.save(conn, movement).await?;
        counter!(
            "warehouse_inventory.stock_movements",
            1,
            "type" => movement.movement_type.to_string()
        );
        Ok(movement)
    }
}
