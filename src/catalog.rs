//! Scheme catalog: embedded snapshot and remote-catalog cache.
//!
//! The embedded snapshot lets a UI populate version/category/topic pickers
//! without a network round-trip; the remote fetch (see `client`) is the source
//! of truth and is cached per scheme version in an LRU cache.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use once_cell::sync::Lazy;

use crate::types::{Category, Criterion, SchemeVersion, Topic};

fn criterion(id: &str, name: &str, max_points: f64, requires_documents: bool) -> Criterion {
    Criterion {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        max_points,
        requires_documents,
    }
}

/// Embedded catalog snapshot.
///
/// Kept deliberately small: enough for picker UIs and offline tests. The
/// remote catalog is authoritative.
static EMBEDDED: Lazy<Vec<SchemeVersion>> = Lazy::new(|| {
    vec![
        SchemeVersion {
            id: "dgnb-2023".into(),
            label: "DGNB New Construction 2023".into(),
            categories: vec![
                Category {
                    id: "ENV".into(),
                    name: "Environmental quality".into(),
                    topics: vec![
                        Topic {
                            id: "ENV1.1".into(),
                            name: "Building life cycle assessment".into(),
                            criteria: vec![
                                criterion("ENV1.1-01", "Life cycle assessment performed", 10.0, true),
                                criterion("ENV1.1-02", "GWP benchmark met", 8.0, true),
                                criterion("ENV1.1-03", "Optimization in early phases", 4.0, false),
                            ],
                        },
                        Topic {
                            id: "ENV2.2".into(),
                            name: "Drinking water demand and waste water volume".into(),
                            criteria: vec![
                                criterion("ENV2.2-01", "Water usage concept", 6.0, true),
                                criterion("ENV2.2-02", "Rainwater utilization", 4.0, false),
                            ],
                        },
                    ],
                },
                Category {
                    id: "ECO".into(),
                    name: "Economic quality".into(),
                    topics: vec![Topic {
                        id: "ECO1.1".into(),
                        name: "Life cycle cost".into(),
                        criteria: vec![
                            criterion("ECO1.1-01", "Life cycle cost calculation", 8.0, true),
                            criterion("ECO1.1-02", "Cost benchmark met", 6.0, false),
                        ],
                    }],
                },
                Category {
                    id: "SOC".into(),
                    name: "Sociocultural and functional quality".into(),
                    topics: vec![Topic {
                        id: "SOC1.2".into(),
                        name: "Indoor air quality".into(),
                        criteria: vec![
                            criterion("SOC1.2-01", "Measurement of indoor pollutants", 7.0, true),
                            criterion("SOC1.2-02", "Ventilation concept", 5.0, true),
                        ],
                    }],
                },
                Category {
                    id: "TEC".into(),
                    name: "Technical quality".into(),
                    topics: vec![Topic {
                        id: "TEC1.4".into(),
                        name: "Use and integration of building technology".into(),
                        criteria: vec![
                            criterion("TEC1.4-01", "Energy monitoring installed", 6.0, true),
                            criterion("TEC1.4-02", "Renewable generation on site", 6.0, false),
                        ],
                    }],
                },
            ],
        },
        SchemeVersion {
            id: "dgnb-2018".into(),
            label: "DGNB New Construction 2018".into(),
            categories: vec![Category {
                id: "ENV".into(),
                name: "Environmental quality".into(),
                topics: vec![Topic {
                    id: "ENV1.1".into(),
                    name: "Building life cycle assessment".into(),
                    criteria: vec![
                        criterion("ENV1.1-01", "Life cycle assessment performed", 10.0, true),
                        criterion("ENV1.1-02", "GWP benchmark met", 6.0, true),
                    ],
                }],
            }],
        },
    ]
});

/// All scheme versions in the embedded snapshot.
pub fn embedded_versions() -> &'static [SchemeVersion] {
    &EMBEDDED
}

/// Find an embedded scheme version by id.
pub fn embedded_version(id: &str) -> Option<&'static SchemeVersion> {
    EMBEDDED.iter().find(|v| v.id == id)
}

/// LRU cache for remotely fetched scheme versions, keyed by version id.
pub struct CatalogCache {
    inner: Mutex<LruCache<String, SchemeVersion>>,
}

impl CatalogCache {
    /// Create a cache holding up to `capacity` scheme versions.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fetch a cached version, refreshing its recency.
    pub fn get(&self, id: &str) -> Option<SchemeVersion> {
        self.inner
            .lock()
            .ok()
            .and_then(|mut cache| cache.get(id).cloned())
    }

    /// Insert a fetched version.
    pub fn put(&self, version: SchemeVersion) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(version.id.clone(), version);
        }
    }

    /// Drop all cached versions.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.inner.lock().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("CatalogCache").field("len", &len).finish()
    }
}
