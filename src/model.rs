//! Restaurant, menu item and request/response types.
//!
//! Catalog collaborators hand out `*Entity` records; the search core only ever
//! returns the mapped DTOs ([`Restaurant`], [`MenuItem`]). Mapping is explicit
//! through `From` impls so every field copy is checked by the compiler.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ForkfulError, Result};
use crate::geo::GeoPoint;

/// Restaurant as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantEntity {
    /// Storage-level identifier. Not used for deduplication.
    #[serde(default)]
    pub id: String,
    /// Canonical restaurant identifier.
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "time_of_day")]
    pub opens_at: NaiveTime,
    #[serde(with = "time_of_day")]
    pub closes_at: NaiveTime,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Restaurant returned to callers and stored in the geo cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub restaurant_id: String,
    pub name: String,
    pub city: String,
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "time_of_day")]
    pub opens_at: NaiveTime,
    #[serde(with = "time_of_day")]
    pub closes_at: NaiveTime,
    pub attributes: Vec<String>,
}

impl Restaurant {
    /// The restaurant's location.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::unchecked(self.latitude, self.longitude)
    }
}

impl From<RestaurantEntity> for Restaurant {
    fn from(entity: RestaurantEntity) -> Self {
        Restaurant {
            restaurant_id: entity.restaurant_id,
            name: entity.name,
            city: entity.city,
            image_url: entity.image_url,
            latitude: entity.latitude,
            longitude: entity.longitude,
            opens_at: entity.opens_at,
            closes_at: entity.closes_at,
            attributes: entity.attributes,
        }
    }
}

impl From<&RestaurantEntity> for Restaurant {
    fn from(entity: &RestaurantEntity) -> Self {
        Restaurant::from(entity.clone())
    }
}

impl RestaurantEntity {
    /// The restaurant's location.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::unchecked(self.latitude, self.longitude)
    }
}

/// Menu item as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemEntity {
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    pub restaurant_id: String,
}

/// Menu item DTO. Only used to resolve "restaurants serving X".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub item_id: String,
    pub name: String,
    pub attributes: Vec<String>,
    pub restaurant_id: String,
}

impl From<MenuItemEntity> for MenuItem {
    fn from(entity: MenuItemEntity) -> Self {
        MenuItem {
            item_id: entity.item_id,
            name: entity.name,
            attributes: entity.attributes,
            restaurant_id: entity.restaurant_id,
        }
    }
}

/// A nearby or search request coming from the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub search_for: Option<String>,
    /// Time of day the request is evaluated at. `None` means "ask the clock".
    #[serde(default, with = "optional_time_of_day")]
    pub current_time: Option<NaiveTime>,
}

impl SearchRequest {
    /// Create a nearby request without a search string.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        SearchRequest {
            latitude,
            longitude,
            search_for: None,
            current_time: None,
        }
    }

    /// Set the free-text query.
    pub fn with_search_for<S: Into<String>>(mut self, search_for: S) -> Self {
        self.search_for = Some(search_for.into());
        self
    }

    /// Pin the request to a time of day instead of the service clock.
    pub fn at(mut self, time: NaiveTime) -> Self {
        self.current_time = Some(time);
        self
    }

    /// The query text, empty when absent.
    pub fn query(&self) -> &str {
        self.search_for.as_deref().unwrap_or("")
    }

    /// Check coordinate ranges. The search core assumes this already passed.
    pub fn validate(&self) -> Result<()> {
        GeoPoint::new(self.latitude, self.longitude).map(|_| ())
    }
}

/// Ordered, duplicate-free list of restaurants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub restaurants: Vec<Restaurant>,
}

impl SearchResult {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        SearchResult { restaurants }
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Restaurant identifiers in result order.
    pub fn restaurant_ids(&self) -> Vec<&str> {
        self.restaurants
            .iter()
            .map(|r| r.restaurant_id.as_str())
            .collect()
    }
}

/// Parse `HH:MM:SS` or `HH:MM`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| ForkfulError::invalid_argument(format!("Invalid time of day '{value}': {e}")))
}

pub(crate) mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

mod optional_time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_some(&time.format("%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_time_of_day(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> RestaurantEntity {
        RestaurantEntity {
            id: "5c3f".to_string(),
            restaurant_id: "11".to_string(),
            name: "Curry House".to_string(),
            city: "Pune".to_string(),
            image_url: "https://img.example/11.png".to_string(),
            latitude: 20.0,
            longitude: 30.0,
            opens_at: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            closes_at: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
            attributes: vec!["Indian".to_string(), "Spicy".to_string()],
        }
    }

    #[test]
    fn test_entity_mapping_keeps_canonical_id() {
        let restaurant = Restaurant::from(entity());
        assert_eq!(restaurant.restaurant_id, "11");
        assert_eq!(restaurant.name, "Curry House");
        assert_eq!(restaurant.attributes, vec!["Indian", "Spicy"]);
        assert_eq!(restaurant.location().lat, 20.0);
    }

    #[test]
    fn test_time_fields_accept_short_form() {
        let json = r#"{
            "restaurant_id": "7",
            "name": "Dosa Point",
            "latitude": 12.9,
            "longitude": 77.6,
            "opens_at": "07:30",
            "closes_at": "23:00:00"
        }"#;
        let entity: RestaurantEntity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.opens_at, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert!(entity.attributes.is_empty());

        let out = serde_json::to_value(Restaurant::from(entity)).unwrap();
        assert_eq!(out["opens_at"], "07:30:00");
    }

    #[test]
    fn test_request_validation() {
        assert!(SearchRequest::new(20.0, 30.0).validate().is_ok());
        assert!(SearchRequest::new(91.0, 30.0).validate().is_err());
        assert!(SearchRequest::new(20.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_request_query_defaults_to_empty() {
        let request = SearchRequest::new(1.0, 2.0);
        assert_eq!(request.query(), "");

        let request = request.with_search_for("biryani");
        assert_eq!(request.query(), "biryani");
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(
            parse_time_of_day("03:00").unwrap(),
            NaiveTime::from_hms_opt(3, 0, 0).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
    }
}
