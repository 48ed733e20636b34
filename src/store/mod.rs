//! Stateful stores that sit between the fetcher and a presentation layer

pub mod conversion;
pub mod list;

pub use conversion::{ConversionController, ConversionSnapshot, ResponseOrdering, Side};
pub use list::{ListSnapshot, ListStore};
