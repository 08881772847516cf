//! Read-only catalog collaborators.
//!
//! The search core never writes to a catalog. Every lookup can fail (the
//! backing database may time out or drop the connection); such failures are
//! returned as [`ForkfulError::Catalog`](crate::error::ForkfulError::Catalog)
//! and propagated by the sequential search paths.

use crate::error::Result;
use crate::model::{MenuItemEntity, RestaurantEntity};

pub mod memory;

pub use memory::{CatalogSnapshot, InMemoryCatalog};

/// Restaurant lookups.
pub trait RestaurantCatalog: Send + Sync {
    /// Every restaurant in the catalog.
    fn list_all(&self) -> Result<Vec<RestaurantEntity>>;

    /// Restaurants whose name equals `query` (case-sensitive).
    fn find_by_name_exact(&self, query: &str) -> Result<Vec<RestaurantEntity>>;

    /// Restaurants whose name contains `query` (case-sensitive).
    fn find_by_name_partial(&self, query: &str) -> Result<Vec<RestaurantEntity>>;

    /// Restaurants where every token matches at least one attribute, case-insensitively.
    fn find_by_attribute_tokens(&self, tokens: &[String]) -> Result<Vec<RestaurantEntity>>;

    /// Restaurants with the given canonical identifiers.
    fn find_by_identifiers(&self, ids: &[String]) -> Result<Vec<RestaurantEntity>>;
}

/// Menu lookups used to resolve "restaurants serving X".
pub trait MenuCatalog: Send + Sync {
    /// Items whose name equals `query`, ignoring case.
    fn find_items_by_name_exact(&self, query: &str) -> Result<Vec<MenuItemEntity>>;

    /// Items whose name contains any of `tokens`, ignoring case.
    fn find_items_by_name_tokens(&self, tokens: &[String]) -> Result<Vec<MenuItemEntity>>;

    /// Items where every token matches at least one attribute, ignoring case.
    fn find_items_by_attribute_tokens(&self, tokens: &[String]) -> Result<Vec<MenuItemEntity>>;

    /// Identifiers of the restaurants whose menus contain any of `item_ids`.
    fn find_restaurant_ids_for_item_ids(&self, item_ids: &[String]) -> Result<Vec<String>>;
}
