//! Star table domain — observation records and the CSV-backed table store.

mod record;
mod store;

pub use record::{NOTES_DELIMITER, StarRecord};
pub use store::{CatalogError, StarTable};
