//! Process-unique identifiers and lookup of live entities by [`Id`].
//!
//! Identifiers come from a global counter and are never reused. The registry
//! itself is thread-local: entities are [`Rc`]-shared and cannot leave the
//! thread that created them, so every live entity is visible to exactly one
//! registry.

use crate::{Entity, Handle};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of an entity.
pub type Id = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static REGISTRY: RefCell<HashMap<Id, Weak<dyn Entity>>> = RefCell::new(HashMap::new());
}

/// Returns a fresh identifier that has never been handed out before.
///
/// ```rust
/// use biophylo_core::identity;
/// let a = identity::allocate();
/// let b = identity::allocate();
/// assert!(b > a);
/// ```
pub fn allocate() -> Id {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Associates the entity's identifier with a non-owning handle to it.
pub fn register(handle: &Handle) {
    let weak = Rc::downgrade(handle);
    REGISTRY.with(|registry| registry.borrow_mut().insert(handle.id(), weak));
}

/// Forgets an identifier. Unknown identifiers are ignored.
///
/// Called from entity destructors, so this never panics, even while the
/// registry is borrowed or being torn down at thread exit.
pub fn retire(id: Id) {
    let _ = REGISTRY.try_with(|registry| {
        if let Ok(mut registry) = registry.try_borrow_mut() {
            registry.remove(&id);
        }
    });
}

/// Returns the live entity behind `id`, or [`None`] if it was retired or dropped.
///
/// ```rust
/// use biophylo_core::{identity, Entity, Set};
/// let set = Set::new("clade")?;
/// let id = set.id();
/// assert_eq!(identity::resolve(id).map(|e| e.id()), Some(id));
///
/// drop(set);
/// assert!(identity::resolve(id).is_none());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn resolve(id: Id) -> Option<Handle> {
    REGISTRY
        .try_with(|registry| registry.try_borrow().ok()?.get(&id).and_then(Weak::upgrade))
        .ok()
        .flatten()
}

/// Wraps a freshly constructed entity in an [`Rc`] and registers it.
///
/// Every entity constructor goes through here.
pub fn install<T: Entity>(entity: T) -> Rc<T> {
    let entity = Rc::new(entity);
    let handle: Handle = entity.clone();
    register(&handle);
    entity
}

/// Returns the number of registered identifiers that still resolve to a live entity.
pub fn live_count() -> usize {
    REGISTRY.with(|registry| {
        registry.borrow().values().filter(|weak| weak.strong_count() > 0).count()
    })
}
