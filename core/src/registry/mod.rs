//! Debug class registry
//!
//! Caches the inspectable classes discovered in a [`TypeCatalog`] and
//! notifies subscribers whenever the cache is rebuilt.
//!
//! # Cache lifecycle
//!
//! The cache starts empty and stale. The first [`DebugRegistry::classes`]
//! call (or an explicit [`DebugRegistry::refresh`]) scans the catalog and
//! publishes an immutable snapshot. [`DebugRegistry::invalidate`] drops the
//! snapshot without scanning; the next read rebuilds it.
//!
//! A rebuild is always a full rescan. Clearing, scanning and marking the
//! cache valid happen under one lock, so a reader sees either the previous
//! snapshot or the new one. Readers hold the lock only long enough to clone
//! the snapshot `Arc`.
//!
//! Listeners run after the lock is released, in registration order, on the
//! thread that triggered the rebuild. A listener may read the registry or
//! change subscriptions; calling `refresh` from a listener rebuilds again.
//!
//! Concurrent rebuilds on different threads may notify concurrently. An
//! update older than one already delivered is dropped, but a listener that
//! caches `update.classes` should still keep the highest `generation` it has
//! seen.

mod scan;
mod tests;

pub mod order;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::catalog::{LinkedCatalog, TypeCatalog};
use crate::config::RegistryConfig;
use crate::model::{ClassInfo, TypeKey};

/// Snapshot of the registered classes, in display order
pub type ClassList = Arc<[Arc<ClassInfo>]>;

/// Payload delivered to listeners after each rebuild
#[derive(Debug, Clone)]
pub struct RegistryUpdate {
    /// Rebuild counter, starting at 1 for the first scan
    pub generation: u64,
    pub classes: ClassList,
}

/// Handle returned by [`DebugRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&RegistryUpdate) + Send + Sync>;

/// Host lifecycle transitions the registry reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Code was reloaded; type descriptions may have changed
    ModulesReloaded,
    EnteredEditMode,
    ExitingEditMode,
    EnteredPlayMode,
    ExitingPlayMode,
}

struct Cache {
    classes: ClassList,
    valid: bool,
    generation: u64,
}

/// Registry of inspectable classes
pub struct DebugRegistry {
    catalog: Box<dyn TypeCatalog>,
    config: RegistryConfig,
    cache: Mutex<Cache>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
    delivered: AtomicU64,
}

impl DebugRegistry {
    /// Create a registry over `catalog`. Nothing is scanned until first use.
    pub fn new(catalog: impl TypeCatalog + 'static) -> Self {
        Self::with_config(catalog, RegistryConfig::default())
    }

    pub fn with_config(catalog: impl TypeCatalog + 'static, config: RegistryConfig) -> Self {
        Self {
            catalog: Box::new(catalog),
            config,
            cache: Mutex::new(Cache {
                classes: Arc::from(Vec::new()),
                valid: false,
                generation: 0,
            }),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            delivered: AtomicU64::new(0),
        }
    }

    /// Registry over every type registered by the macros in this binary
    pub fn linked() -> Self {
        Self::new(LinkedCatalog)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Rescan the catalog, replace the cache and notify listeners
    pub fn refresh(&self) {
        let update = {
            let mut cache = self.cache.lock();
            self.rebuild(&mut cache)
        };
        self.notify(&update);
    }

    /// Drop the cache without rescanning; the next read rebuilds it
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock();
        cache.valid = false;
        cache.classes = Arc::from(Vec::new());
    }

    /// Whether the cache currently holds a valid snapshot
    pub fn is_valid(&self) -> bool {
        self.cache.lock().valid
    }

    /// Number of rebuilds so far
    pub fn generation(&self) -> u64 {
        self.cache.lock().generation
    }

    /// Current snapshot, rebuilding first if the cache is stale
    pub fn classes(&self) -> ClassList {
        self.snapshot().classes
    }

    /// Current snapshot together with the generation that produced it
    pub fn snapshot(&self) -> RegistryUpdate {
        let update = {
            let mut cache = self.cache.lock();
            if cache.valid {
                return RegistryUpdate {
                    generation: cache.generation,
                    classes: cache.classes.clone(),
                };
            }
            self.rebuild(&mut cache)
        };
        self.notify(&update);
        update
    }

    /// Look up a class by type
    pub fn class(&self, key: &TypeKey) -> Option<Arc<ClassInfo>> {
        self.classes()
            .iter()
            .find(|class| class.type_key == *key)
            .cloned()
    }

    /// Look up the class describing `T`
    pub fn class_of<T: std::any::Any>(&self) -> Option<Arc<ClassInfo>> {
        self.class(&TypeKey::of::<T>())
    }

    /// Look up a class by display name or type name
    pub fn class_named(&self, name: &str) -> Option<Arc<ClassInfo>> {
        self.classes()
            .iter()
            .find(|class| class.display_name == name || class.type_key.name() == name)
            .cloned()
    }

    /// Register a listener invoked after every rebuild
    pub fn subscribe(
        &self,
        listener: impl Fn(&RegistryUpdate) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Apply the refresh policy to a host lifecycle transition.
    ///
    /// Returns whether a refresh ran.
    pub fn on_lifecycle(&self, event: LifecycleEvent) -> bool {
        let refresh = match event {
            LifecycleEvent::ModulesReloaded => self.config.refresh_on_reload,
            LifecycleEvent::EnteredPlayMode
            | LifecycleEvent::ExitingPlayMode
            | LifecycleEvent::EnteredEditMode => self.config.refresh_on_play_mode,
            LifecycleEvent::ExitingEditMode => false,
        };

        if refresh {
            tracing::debug!(?event, "refreshing debug registry");
            self.refresh();
        }
        refresh
    }

    fn rebuild(&self, cache: &mut Cache) -> RegistryUpdate {
        cache.classes = Arc::from(Vec::new());
        cache.classes = scan::build_classes(self.catalog.as_ref()).into();
        cache.valid = true;
        cache.generation += 1;

        RegistryUpdate {
            generation: cache.generation,
            classes: cache.classes.clone(),
        }
    }

    fn notify(&self, update: &RegistryUpdate) {
        let newest = self.delivered.fetch_max(update.generation, Ordering::AcqRel);
        if newest > update.generation {
            tracing::trace!(
                generation = update.generation,
                newest,
                "skipping superseded registry update"
            );
            return;
        }

        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(update);
        }
    }
}
