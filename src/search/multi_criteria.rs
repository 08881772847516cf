//! Four-way text search: restaurant name, restaurant attributes, menu item
//! names and menu item attributes.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use ahash::AHashSet;
use chrono::NaiveTime;
use log::{debug, info};

use crate::catalog::{MenuCatalog, RestaurantCatalog};
use crate::error::{ForkfulError, Result};
use crate::model::{MenuItemEntity, Restaurant, RestaurantEntity};
use crate::query::{is_blank, tokenize};
use crate::search::{SearchContext, merge_first_occurrence};

/// One of the independent match strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubSearchKind {
    ByName,
    ByAttribute,
    ByItemName,
    ByItemAttribute,
}

impl SubSearchKind {
    /// All strategies in merge order.
    pub const ALL: [SubSearchKind; 4] = [
        SubSearchKind::ByName,
        SubSearchKind::ByAttribute,
        SubSearchKind::ByItemName,
        SubSearchKind::ByItemAttribute,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SubSearchKind::ByName => "by-name",
            SubSearchKind::ByAttribute => "by-attribute",
            SubSearchKind::ByItemName => "by-item-name",
            SubSearchKind::ByItemAttribute => "by-item-attribute",
        }
    }
}

impl fmt::Display for SubSearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checked between catalog round trips so abandoned work stops early.
pub type CancelCheck<'a> = &'a (dyn Fn() -> bool + Sync);

fn never_cancelled() -> bool {
    false
}

fn checkpoint(kind: SubSearchKind, is_cancelled: CancelCheck<'_>) -> Result<()> {
    if is_cancelled() {
        Err(ForkfulError::cancelled(format!("{kind} sub-search abandoned")))
    } else {
        Ok(())
    }
}

/// Runs the four sub-searches and merges them by first occurrence.
#[derive(Clone)]
pub struct MultiCriteriaSearch {
    restaurants: Arc<dyn RestaurantCatalog>,
    menus: Arc<dyn MenuCatalog>,
}

impl MultiCriteriaSearch {
    pub fn new(restaurants: Arc<dyn RestaurantCatalog>, menus: Arc<dyn MenuCatalog>) -> Self {
        Self { restaurants, menus }
    }

    /// Search every strategy for `query` and merge the results.
    ///
    /// A blank query returns an empty list without touching the catalogs.
    /// Output order is first occurrence across by-name, by-attribute,
    /// by-item-name, by-item-attribute; it is not sorted by distance.
    pub fn search(
        &self,
        lat: f64,
        lon: f64,
        query: &str,
        time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<Restaurant>> {
        if is_blank(query) {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let ctx = SearchContext::new(lat, lon, query, time, radius_km);
        let lists = SubSearchKind::ALL
            .iter()
            .map(|&kind| self.run(kind, &ctx))
            .collect::<Result<Vec<_>>>()?;
        let merged = merge_first_occurrence(lists);

        info!(
            "search '{query}' matched {} restaurants in {:?}",
            merged.len(),
            start.elapsed()
        );
        Ok(merged)
    }

    /// Run a single strategy.
    pub fn run(&self, kind: SubSearchKind, ctx: &SearchContext) -> Result<Vec<Restaurant>> {
        self.run_checked(kind, ctx, &never_cancelled)
    }

    /// Run a single strategy, stopping with `OperationCancelled` as soon as
    /// `is_cancelled` reports true between catalog calls.
    pub fn run_checked(
        &self,
        kind: SubSearchKind,
        ctx: &SearchContext,
        is_cancelled: CancelCheck<'_>,
    ) -> Result<Vec<Restaurant>> {
        checkpoint(kind, is_cancelled)?;
        let found = match kind {
            SubSearchKind::ByName => self.by_name(ctx, is_cancelled),
            SubSearchKind::ByAttribute => self.by_attribute(ctx),
            SubSearchKind::ByItemName => self.by_item_name(ctx, is_cancelled),
            SubSearchKind::ByItemAttribute => self.by_item_attribute(ctx, is_cancelled),
        }?;
        debug!("{kind} matched {} restaurants", found.len());
        Ok(found)
    }

    /// Partial name matches first, then exact ones, without duplicates.
    fn by_name(&self, ctx: &SearchContext, is_cancelled: CancelCheck<'_>) -> Result<Vec<Restaurant>> {
        let partial = self.restaurants.find_by_name_partial(&ctx.query)?;
        checkpoint(SubSearchKind::ByName, is_cancelled)?;
        let exact = self.restaurants.find_by_name_exact(&ctx.query)?;

        let mut seen = AHashSet::new();
        let union: Vec<RestaurantEntity> = partial
            .into_iter()
            .chain(exact)
            .filter(|e| seen.insert(e.restaurant_id.clone()))
            .collect();
        Ok(ctx.filter().apply(union))
    }

    fn by_attribute(&self, ctx: &SearchContext) -> Result<Vec<Restaurant>> {
        let tokens = tokenize(&ctx.query);
        let entities = self.restaurants.find_by_attribute_tokens(&tokens)?;
        Ok(ctx.filter().apply(entities))
    }

    fn by_item_name(
        &self,
        ctx: &SearchContext,
        is_cancelled: CancelCheck<'_>,
    ) -> Result<Vec<Restaurant>> {
        let mut items = self.menus.find_items_by_name_exact(&ctx.query)?;
        checkpoint(SubSearchKind::ByItemName, is_cancelled)?;
        items.extend(self.menus.find_items_by_name_tokens(&tokenize(&ctx.query))?);
        self.restaurants_serving(SubSearchKind::ByItemName, items, ctx, is_cancelled)
    }

    fn by_item_attribute(
        &self,
        ctx: &SearchContext,
        is_cancelled: CancelCheck<'_>,
    ) -> Result<Vec<Restaurant>> {
        let items = self
            .menus
            .find_items_by_attribute_tokens(&tokenize(&ctx.query))?;
        self.restaurants_serving(SubSearchKind::ByItemAttribute, items, ctx, is_cancelled)
    }

    /// items → owning restaurant ids → restaurants → open-and-nearby filter.
    fn restaurants_serving(
        &self,
        kind: SubSearchKind,
        items: Vec<MenuItemEntity>,
        ctx: &SearchContext,
        is_cancelled: CancelCheck<'_>,
    ) -> Result<Vec<Restaurant>> {
        let mut seen = AHashSet::new();
        let item_ids: Vec<String> = items
            .into_iter()
            .map(|i| i.item_id)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        checkpoint(kind, is_cancelled)?;
        let restaurant_ids = self.menus.find_restaurant_ids_for_item_ids(&item_ids)?;
        if restaurant_ids.is_empty() {
            return Ok(Vec::new());
        }

        checkpoint(kind, is_cancelled)?;
        let entities = self.restaurants.find_by_identifiers(&restaurant_ids)?;
        Ok(ctx.filter().apply(entities))
    }
}
