//! Catalog backed by an in-memory snapshot.

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::catalog::{MenuCatalog, RestaurantCatalog};
use crate::error::Result;
use crate::model::{MenuItemEntity, RestaurantEntity};
use crate::query::TokenSet;

/// Serializable catalog contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub restaurants: Vec<RestaurantEntity>,
    #[serde(default)]
    pub items: Vec<MenuItemEntity>,
}

impl CatalogSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Implements both catalog traits over a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    restaurants: Vec<RestaurantEntity>,
    items: Vec<MenuItemEntity>,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            restaurants: snapshot.restaurants,
            items: snapshot.items,
        }
    }

    /// Load a snapshot file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        CatalogSnapshot::from_file(path).map(Self::new)
    }

    pub fn with_restaurant(mut self, restaurant: RestaurantEntity) -> Self {
        self.restaurants.push(restaurant);
        self
    }

    pub fn with_item(mut self, item: MenuItemEntity) -> Self {
        self.items.push(item);
        self
    }

    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn restaurants_where<F>(&self, predicate: F) -> Vec<RestaurantEntity>
    where
        F: Fn(&RestaurantEntity) -> bool,
    {
        self.restaurants
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    fn items_where<F>(&self, predicate: F) -> Vec<MenuItemEntity>
    where
        F: Fn(&MenuItemEntity) -> bool,
    {
        self.items.iter().filter(|i| predicate(i)).cloned().collect()
    }
}

impl RestaurantCatalog for InMemoryCatalog {
    fn list_all(&self) -> Result<Vec<RestaurantEntity>> {
        Ok(self.restaurants.clone())
    }

    fn find_by_name_exact(&self, query: &str) -> Result<Vec<RestaurantEntity>> {
        Ok(self.restaurants_where(|r| r.name == query))
    }

    fn find_by_name_partial(&self, query: &str) -> Result<Vec<RestaurantEntity>> {
        Ok(self.restaurants_where(|r| r.name.contains(query)))
    }

    fn find_by_attribute_tokens(&self, tokens: &[String]) -> Result<Vec<RestaurantEntity>> {
        let tokens = TokenSet::new(tokens)?;
        Ok(self.restaurants_where(|r| tokens.all_match_any(&r.attributes)))
    }

    fn find_by_identifiers(&self, ids: &[String]) -> Result<Vec<RestaurantEntity>> {
        let wanted: AHashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(self.restaurants_where(|r| wanted.contains(r.restaurant_id.as_str())))
    }
}

impl MenuCatalog for InMemoryCatalog {
    fn find_items_by_name_exact(&self, query: &str) -> Result<Vec<MenuItemEntity>> {
        let query = query.to_lowercase();
        Ok(self.items_where(|i| i.name.to_lowercase() == query))
    }

    fn find_items_by_name_tokens(&self, tokens: &[String]) -> Result<Vec<MenuItemEntity>> {
        let tokens = TokenSet::new(tokens)?;
        Ok(self.items_where(|i| tokens.any_matches(&i.name)))
    }

    fn find_items_by_attribute_tokens(&self, tokens: &[String]) -> Result<Vec<MenuItemEntity>> {
        let tokens = TokenSet::new(tokens)?;
        Ok(self.items_where(|i| tokens.all_match_any(&i.attributes)))
    }

    fn find_restaurant_ids_for_item_ids(&self, item_ids: &[String]) -> Result<Vec<String>> {
        let wanted: AHashSet<&str> = item_ids.iter().map(String::as_str).collect();
        let mut seen = AHashSet::new();
        Ok(self
            .items
            .iter()
            .filter(|i| wanted.contains(i.item_id.as_str()))
            .filter(|i| seen.insert(i.restaurant_id.clone()))
            .map(|i| i.restaurant_id.clone())
            .collect())
    }
}
