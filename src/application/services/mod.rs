//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ProfileStore, DealStore)
//! but are themselves concrete structs, not traits.

mod deal;
mod profile;
mod taxonomy;

pub use deal::DealService;
pub use profile::ProfileService;
pub use taxonomy::TaxonomyService;
