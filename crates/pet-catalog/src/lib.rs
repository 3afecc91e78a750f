//! Static catalog of Live2D models.
//!
//! The catalog is loaded once at startup, either from the built-in table
//! compiled into the binary or from a user-supplied JSON file, and is never
//! mutated afterwards. Iteration order is declaration order so menus built
//! from it are deterministic.

pub mod catalog;
pub mod error;

pub use catalog::ModelCatalog;
pub use error::CatalogError;
