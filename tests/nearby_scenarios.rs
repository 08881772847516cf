use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveTime;

use forkful::cache::{CacheStore, GeoCache, MemoryCacheStore};
use forkful::catalog::{InMemoryCatalog, RestaurantCatalog};
use forkful::clock::FixedClock;
use forkful::config::{CacheCodec, ForkfulConfig, GeoCacheConfig};
use forkful::error::Result;
use forkful::geo::haversine_distance_km;
use forkful::model::{Restaurant, RestaurantEntity, SearchRequest};
use forkful::service::RestaurantService;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn restaurant(id: &str, lat: f64, lon: f64, opens: NaiveTime, closes: NaiveTime) -> RestaurantEntity {
    RestaurantEntity {
        id: format!("oid-{id}"),
        restaurant_id: id.to_string(),
        name: format!("Restaurant {id}"),
        city: "Testville".to_string(),
        image_url: format!("https://img.example/{id}.png"),
        latitude: lat,
        longitude: lon,
        opens_at: opens,
        closes_at: closes,
        attributes: vec!["Cafe".to_string()],
    }
}

/// Counts `list_all` calls on top of an in-memory catalog.
struct CountingCatalog {
    inner: InMemoryCatalog,
    list_all_calls: AtomicUsize,
}

impl CountingCatalog {
    fn new(inner: InMemoryCatalog) -> Self {
        Self {
            inner,
            list_all_calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.list_all_calls.load(Ordering::SeqCst)
    }
}

impl RestaurantCatalog for CountingCatalog {
    fn list_all(&self) -> Result<Vec<RestaurantEntity>> {
        self.list_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_all()
    }
    fn find_by_name_exact(&self, q: &str) -> Result<Vec<RestaurantEntity>> {
        self.inner.find_by_name_exact(q)
    }
    fn find_by_name_partial(&self, q: &str) -> Result<Vec<RestaurantEntity>> {
        self.inner.find_by_name_partial(q)
    }
    fn find_by_attribute_tokens(&self, tokens: &[String]) -> Result<Vec<RestaurantEntity>> {
        self.inner.find_by_attribute_tokens(tokens)
    }
    fn find_by_identifiers(&self, ids: &[String]) -> Result<Vec<RestaurantEntity>> {
        self.inner.find_by_identifiers(ids)
    }
}

/// "11" at ~2 km and "12" at ~6 km north of (20.0, 30.0), both open 00:00-23:59.
fn scenario_catalog() -> InMemoryCatalog {
    InMemoryCatalog::default()
        .with_restaurant(restaurant("11", 20.018, 30.0, t(0, 0), t(23, 59)))
        .with_restaurant(restaurant("12", 20.054, 30.0, t(0, 0), t(23, 59)))
}

fn service(
    catalog: Arc<CountingCatalog>,
    store: Arc<MemoryCacheStore>,
    now: NaiveTime,
    config: ForkfulConfig,
) -> Result<RestaurantService> {
    RestaurantService::builder()
        .restaurant_catalog(catalog)
        .menu_catalog(Arc::new(InMemoryCatalog::default()))
        .cache_store(store)
        .clock(Arc::new(FixedClock(now)))
        .config(config)
        .build()
}

#[test]
fn off_peak_nearby_returns_only_restaurants_inside_five_km() -> Result<()> {
    let catalog = Arc::new(CountingCatalog::new(scenario_catalog()));
    let store = Arc::new(MemoryCacheStore::new());
    let service = service(catalog, store, t(3, 0), ForkfulConfig::default())?;

    let result = service.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(result.restaurant_ids(), vec!["11"]);

    let r = &result.restaurants[0];
    assert_eq!(r.city, "Testville");
    assert_eq!(r.image_url, "https://img.example/11.png");
    Ok(())
}

#[test]
fn second_lookup_in_same_cell_is_served_from_cache() -> Result<()> {
    let catalog = Arc::new(CountingCatalog::new(scenario_catalog()));
    let store = Arc::new(MemoryCacheStore::new());
    let service = service(catalog.clone(), store.clone(), t(3, 0), ForkfulConfig::default())?;

    let first = service.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(catalog.calls(), 1);
    assert_eq!(store.len(), 1);

    // A few meters away: same precision-7 cell.
    let second = service.find_nearby(&SearchRequest::new(20.0001, 30.0001))?;
    assert_eq!(catalog.calls(), 1);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn cached_list_is_returned_as_stored() -> Result<()> {
    let catalog = Arc::new(CountingCatalog::new(scenario_catalog()));
    let store = Arc::new(MemoryCacheStore::new());

    let night = service(catalog.clone(), store.clone(), t(3, 0), ForkfulConfig::default())?;
    night.find_nearby(&SearchRequest::new(20.0, 30.0))?;

    // At 23:59 nothing is open, but the cell entry written at 03:00 still wins.
    let late = service(catalog.clone(), store, t(23, 59), ForkfulConfig::default())?;
    let result = late.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(result.restaurant_ids(), vec!["11"]);
    assert_eq!(catalog.calls(), 1);
    Ok(())
}

#[test]
fn peak_hours_use_the_smaller_radius() -> Result<()> {
    // ~4 km away: inside the normal radius, outside the peak one.
    let catalog = InMemoryCatalog::default()
        .with_restaurant(restaurant("40", 20.036, 30.0, t(0, 0), t(23, 59)));
    let catalog = Arc::new(CountingCatalog::new(catalog));

    let lunch = service(
        catalog.clone(),
        Arc::new(MemoryCacheStore::new()),
        t(13, 30),
        ForkfulConfig::default(),
    )?;
    assert!(lunch.find_nearby(&SearchRequest::new(20.0, 30.0))?.is_empty());

    let afternoon = service(
        catalog,
        Arc::new(MemoryCacheStore::new()),
        t(16, 0),
        ForkfulConfig::default(),
    )?;
    let found = afternoon.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(found.restaurant_ids(), vec!["40"]);
    Ok(())
}

#[test]
fn opening_hours_are_strict() -> Result<()> {
    let catalog = InMemoryCatalog::default()
        .with_restaurant(restaurant("opens-now", 20.001, 30.0, t(3, 0), t(23, 0)))
        .with_restaurant(restaurant("closes-now", 20.002, 30.0, t(0, 0), t(3, 0)))
        .with_restaurant(restaurant("open", 20.003, 30.0, t(2, 59), t(3, 1)));
    let service = service(
        Arc::new(CountingCatalog::new(catalog)),
        Arc::new(MemoryCacheStore::new()),
        t(3, 0),
        ForkfulConfig::default(),
    )?;

    let result = service.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(result.restaurant_ids(), vec!["open"]);
    Ok(())
}

#[test]
fn shared_restaurant_id_is_returned_once() -> Result<()> {
    let mut first = restaurant("11", 20.018, 30.0, t(0, 0), t(23, 59));
    first.id = "a".to_string();
    let mut second = restaurant("11", 20.020, 30.0, t(0, 0), t(23, 59));
    second.id = "b".to_string();
    let catalog = InMemoryCatalog::default()
        .with_restaurant(first)
        .with_restaurant(second);
    let service = service(
        Arc::new(CountingCatalog::new(catalog)),
        Arc::new(MemoryCacheStore::new()),
        t(3, 0),
        ForkfulConfig::default(),
    )?;

    let fresh = service.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(fresh.restaurant_ids(), vec!["11"]);
    let cached = service.find_nearby(&SearchRequest::new(20.0, 30.0))?;
    assert_eq!(cached.restaurant_ids(), vec!["11"]);
    Ok(())
}

#[test]
fn cache_round_trip_with_both_codecs() -> Result<()> {
    let list: Vec<Restaurant> = scenario_catalog()
        .list_all()?
        .into_iter()
        .map(Restaurant::from)
        .collect();

    for codec in [CacheCodec::Json, CacheCodec::Bincode] {
        let store = Arc::new(MemoryCacheStore::new());
        let config = GeoCacheConfig {
            codec,
            ..Default::default()
        };
        let cache = GeoCache::new(store.clone(), config);
        let cell = cache.cell_for(20.0, 30.0);

        cache.put(&cell, &list)?;
        assert!(store.exists(cell.as_str())?);
        assert_eq!(cache.get(&cell), Some(list.clone()));
    }
    Ok(())
}

#[test]
fn haversine_is_zero_on_the_diagonal_and_symmetric() {
    assert_eq!(haversine_distance_km(12.97, 77.59, 12.97, 77.59), 0.0);

    let ab = haversine_distance_km(12.97, 77.59, 28.61, 77.21);
    let ba = haversine_distance_km(28.61, 77.21, 12.97, 77.59);
    assert!((ab - ba).abs() < 1e-9);
    // Bengaluru to New Delhi, roughly.
    assert!((ab - 1740.0).abs() < 15.0);
}
