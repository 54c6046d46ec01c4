//! Static category definitions.

pub mod model;
pub mod seed;

pub use model::{Catalog, Category};
