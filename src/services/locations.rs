use crate::repositories::LocationRepository;

use super::CrudService;

/// Storage locations only need the generic operations.
pub type LocationService = CrudService<LocationRepository>;
