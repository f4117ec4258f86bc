use crate::repositories::SupplierRepository;

use super::CrudService;

/// Suppliers only need the generic operations.
pub type SupplierService = CrudService<SupplierRepository>;
