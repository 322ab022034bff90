pub mod catalog;
pub mod events;

pub use catalog::{BodyCatalog, BodyDescriptor, CatalogDescriptor, CatalogError};
pub use events::{event_by_index, AstronomicalEvent, ASTRONOMICAL_EVENTS};
