//! Core types: endpoints, errors, decoded models and the typed fetcher

pub mod config;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod log;
pub mod model;
pub mod transport;

// Re-export main types for cleaner imports
pub use endpoint::Endpoint;
pub use error::{FetchError, TransportError};
pub use fetcher::Fetcher;
pub use model::{
    Currencies, Entry, EntryValue, ExchangeRates, ListData, ListSource, RatesCaption,
};
pub use transport::Transport;
