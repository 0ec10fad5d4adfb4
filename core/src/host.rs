//! Host object collaborator
//!
//! The registry never owns live objects. A host (game loop, editor, test)
//! implements [`HostObjects`] to answer instance queries, and hands out
//! [`LiveObject`] handles that the inspector locks for the duration of a
//! single read, write or call.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use hashbrown::HashSet;
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::model::TypeKey;

/// Host services the inspector depends on
pub trait HostObjects {
    /// Whether the host currently has `key` loaded
    fn is_type_loaded(&self, key: &TypeKey) -> bool;

    /// All live instances of exactly `key`
    fn find_instances(&self, key: &TypeKey) -> Vec<LiveObject>;

    /// Whether the host is running (values change between polls)
    fn is_playing(&self) -> bool;
}

/// Shared handle to a host object
#[derive(Clone)]
pub struct LiveObject {
    id: u64,
    name: Arc<str>,
    type_key: TypeKey,
    value: Arc<Mutex<dyn Any + Send>>,
}

impl LiveObject {
    pub fn new<T: Any + Send>(id: u64, name: impl Into<Arc<str>>, value: T) -> Self {
        Self {
            id,
            name: name.into(),
            type_key: TypeKey::of::<T>(),
            value: Arc::new(Mutex::new(value)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Instance label shown in pickers: `"{name} ({id})"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_key.is::<T>()
    }

    /// Lock the object for direct access
    pub fn lock(&self) -> MutexGuard<'_, dyn Any + Send> {
        self.value.lock()
    }

    /// Run `f` on the object if it is a `T`
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.value.lock();
        guard.downcast_ref::<T>().map(f)
    }

    /// Run `f` on the object mutably if it is a `T`
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.value.lock();
        guard.downcast_mut::<T>().map(f)
    }

    /// Whether both handles refer to the same object
    pub fn ptr_eq(&self, other: &LiveObject) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for LiveObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type", &self.type_key)
            .finish()
    }
}

/// In-memory host: a flat list of spawned objects and a play flag
#[derive(Default)]
pub struct ObjectWorld {
    objects: RwLock<Vec<LiveObject>>,
    unloaded: RwLock<HashSet<TypeKey>>,
    next_id: AtomicU64,
    playing: AtomicBool,
}

impl ObjectWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its handle. Ids start at 1.
    pub fn spawn<T: Any + Send>(&self, name: impl Into<Arc<str>>, value: T) -> LiveObject {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let object = LiveObject::new(id, name, value);
        self.objects.write().push(object.clone());
        tracing::trace!(id, ty = %object.type_key(), "spawned object");
        object
    }

    /// Remove an object by id, returning whether it existed
    pub fn despawn(&self, id: u64) -> bool {
        let mut objects = self.objects.write();
        let before = objects.len();
        objects.retain(|object| object.id() != id);
        objects.len() != before
    }

    pub fn get(&self, id: u64) -> Option<LiveObject> {
        self.objects.read().iter().find(|o| o.id() == id).cloned()
    }

    /// All live objects of type `T`
    pub fn find_objects<T: Any>(&self) -> Vec<LiveObject> {
        self.find_instances(&TypeKey::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Relaxed);
    }

    /// Mark a type as unloaded (its instances stop being reported) or loaded
    pub fn set_type_loaded(&self, key: TypeKey, loaded: bool) {
        let mut unloaded = self.unloaded.write();
        if loaded {
            unloaded.remove(&key);
        } else {
            unloaded.insert(key);
        }
    }
}

impl HostObjects for ObjectWorld {
    fn is_type_loaded(&self, key: &TypeKey) -> bool {
        !self.unloaded.read().contains(key)
    }

    fn find_instances(&self, key: &TypeKey) -> Vec<LiveObject> {
        self.objects
            .read()
            .iter()
            .filter(|object| object.type_key() == *key)
            .cloned()
            .collect()
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}
