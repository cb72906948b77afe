pub mod catalog;

pub use catalog::{CatalogItem, CatalogKind, Episode, Season, StreamServer};
