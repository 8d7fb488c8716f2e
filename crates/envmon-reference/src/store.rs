//! Reference data store for one resource kind
//!
//! Holds the last successfully fetched collection as an immutable
//! [`Snapshot`]. A load replaces the snapshot wholesale; a failed load leaves
//! it untouched. Concurrent loads share one in-flight fetch, which runs on
//! its own task and lands even if every caller stops waiting for it.
//!
//! # Architecture
//!
//! ```text
//! load() ──┐
//! load() ──┼──► shared in-flight fetch ──► CollectionSource::fetch(PATH)
//! load() ──┘                │
//!                           ▼ Ok
//!                  Arc<Snapshot> replaced, generation += 1, subscribers notified
//! ```

use crate::error::FetchError;
use crate::kind::ResourceKind;
use crate::source::CollectionSource;
use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

type InFlight = Shared<BoxFuture<'static, Result<u64, FetchError>>>;

/// Immutable view of a collection as of one successful load
///
/// Stays internally consistent after the store moves on; it just stops being
/// the latest.
pub struct Snapshot<T> {
    generation: u64,
    entities: Vec<T>,
    index: OnceCell<HashMap<String, usize>>,
    key: fn(&T) -> &str,
}

impl<T> Snapshot<T> {
    fn new(generation: u64, entities: Vec<T>, key: fn(&T) -> &str) -> Self {
        Self {
            generation,
            entities,
            index: OnceCell::new(),
            key,
        }
    }

    /// Load generation that produced this snapshot (0 = never loaded)
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Entities in fetch order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.entities
    }

    /// Get entity by identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index().get(id).map(|&pos| &self.entities[pos])
    }

    /// Check if identifier is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index().contains_key(id)
    }

    /// Distinct identifiers in the index
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.index().len()
    }

    fn index(&self) -> &HashMap<String, usize> {
        self.index.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.entities.len());
            for (pos, entity) in self.entities.iter().enumerate() {
                let id = (self.key)(entity);
                if index.insert(id.to_string(), pos).is_some() {
                    tracing::warn!(id, generation = self.generation, "duplicate identifier in collection; last entry wins");
                }
            }
            index
        })
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.entities
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("entities", &self.entities)
            .finish_non_exhaustive()
    }
}

struct StoreState<K: ResourceKind> {
    source: Arc<dyn CollectionSource>,
    current: RwLock<Arc<Snapshot<K::Entity>>>,
    in_flight: Mutex<Option<InFlight>>,
    generation_tx: watch::Sender<u64>,
    fetches: AtomicU64,
}

impl<K: ResourceKind> StoreState<K> {
    async fn fetch_and_replace(self: Arc<Self>) -> Result<u64, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let outcome = match self.fetch_entities().await {
            Ok(entities) => {
                let count = entities.len();
                let generation = self.replace(entities);
                tracing::info!(resource = K::NAME, count, generation, "reference data loaded");
                Ok(generation)
            }
            Err(err) => {
                tracing::warn!(resource = K::NAME, "load failed, keeping previous data: {err}");
                Err(err)
            }
        };
        self.in_flight.lock().take();
        outcome
    }

    async fn fetch_entities(&self) -> Result<Vec<K::Entity>, FetchError> {
        let payload = self.source.fetch(K::PATH).await?;
        if payload.is_null() {
            return Err(FetchError::decode(K::PATH, "empty payload"));
        }
        serde_json::from_value(payload).map_err(|e| FetchError::decode(K::PATH, e))
    }

    fn replace(&self, entities: Vec<K::Entity>) -> u64 {
        let mut current = self.current.write();
        let generation = current.generation + 1;
        *current = Arc::new(Snapshot::new(generation, entities, K::key));
        drop(current);
        self.generation_tx.send_replace(generation);
        generation
    }
}

/// Store owning one resource kind's collection
///
/// Cloning yields another handle to the same store.
pub struct ReferenceStore<K: ResourceKind> {
    state: Arc<StoreState<K>>,
}

impl<K: ResourceKind> ReferenceStore<K> {
    /// Create empty store over `source`
    #[must_use]
    pub fn new(source: Arc<dyn CollectionSource>) -> Self {
        let (generation_tx, _) = watch::channel(0);
        Self {
            state: Arc::new(StoreState {
                source,
                current: RwLock::new(Arc::new(Snapshot::new(0, Vec::new(), K::key))),
                in_flight: Mutex::new(None),
                generation_tx,
                fetches: AtomicU64::new(0),
            }),
        }
    }

    /// Fetch the full collection and replace the current snapshot
    ///
    /// Joins the in-flight fetch if one is running; every joined caller
    /// receives the same outcome. The fetch is spawned onto the Tokio runtime,
    /// so dropping the returned future does not cancel it.
    ///
    /// # Errors
    /// Returns `FetchError` when the service call fails or the payload does
    /// not decode; the previous snapshot stays in place.
    pub async fn load(&self) -> Result<(), FetchError> {
        let pending = {
            let mut slot = self.state.in_flight.lock();
            if let Some(pending) = slot.as_ref() {
                tracing::debug!(resource = K::NAME, "joining in-flight load");
                pending.clone()
            } else {
                let state = Arc::clone(&self.state);
                let pending = tokio::spawn(Arc::clone(&self.state).fetch_and_replace())
                    .map(move |joined| {
                        joined.unwrap_or_else(|err| {
                            state.in_flight.lock().take();
                            tracing::error!(resource = K::NAME, "load task failed: {err}");
                            Err(FetchError::transport(K::PATH, err))
                        })
                    })
                    .boxed()
                    .shared();
                *slot = Some(pending.clone());
                pending
            }
        };
        pending.await.map(|_| ())
    }

    /// Load only if nothing has been loaded yet
    ///
    /// # Errors
    /// Same as [`load`](Self::load)
    pub async fn ensure_loaded(&self) -> Result<(), FetchError> {
        if self.is_loaded() {
            return Ok(());
        }
        self.load().await
    }

    /// Get entity by identifier from the current snapshot
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<K::Entity> {
        self.all().get(id).cloned()
    }

    /// Current snapshot in fetch order
    #[must_use]
    pub fn all(&self) -> Arc<Snapshot<K::Entity>> {
        Arc::clone(&self.state.current.read())
    }

    /// Generation of the current snapshot
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.current.read().generation
    }

    /// Check if at least one load has succeeded
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.generation() > 0
    }

    /// Check if a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.in_flight.lock().is_some()
    }

    /// Number of fetches issued to the source
    #[inline]
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.state.fetches.load(Ordering::Relaxed)
    }

    /// Receiver that observes the generation after each replacement
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.generation_tx.subscribe()
    }

    /// Resource name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        K::NAME
    }
}

impl<K: ResourceKind> Clone for ReferenceStore<K> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K: ResourceKind> fmt::Debug for ReferenceStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceStore")
            .field("resource", &K::NAME)
            .field("generation", &self.generation())
            .field("loading", &self.is_loading())
            .finish()
    }
}
