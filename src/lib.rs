//! # Forkful
//!
//! Restaurant discovery: find restaurants that are open and close to a
//! point, or search them by free text.
//!
//! ## Features
//!
//! - Peak-hour aware serving radius
//! - Geohash-keyed result cache over a pluggable store
//! - Four-way text search over restaurants and menu items
//! - Concurrent by-name / by-attribute search with deadline and cancellation
//! - Injected catalogs, cache store and clock

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod parallel_search;
pub mod policy;
pub mod query;
pub mod search;
pub mod service;

pub mod prelude {
    pub use crate::cache::{CacheStore, GeoCache, MemoryCacheStore};
    pub use crate::catalog::{InMemoryCatalog, MenuCatalog, RestaurantCatalog};
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::ForkfulConfig;
    pub use crate::error::{ForkfulError, Result};
    pub use crate::model::{Restaurant, SearchRequest, SearchResult};
    pub use crate::parallel_search::CancellationToken;
    pub use crate::service::RestaurantService;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
