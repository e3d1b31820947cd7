//! An ordered, kind-checked container of [`Entity`] handles.

use crate::{Entity, Error, Handle, Id, IntoHandle, Kind, NumericField, Set, TextField};
use color_eyre::eyre::{Report, Result};
use itertools::Itertools;
use log::debug;
use num_traits::AsPrimitive;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use strum::{Display, EnumIter, EnumString};


/// Callback invoked with the container, the operation and the affected entities.
pub type Listener = Rc<dyn Fn(&Listable, Operation, &[Handle]) -> Result<(), Report>>;

// ----------------------------------------------------------------------------
// Operation and Comparator
// ----------------------------------------------------------------------------

/// A mutating [`Listable`] operation, as reported to listeners.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Insert,
    InsertAt,
    Delete,
    Clear,
}

/// Numeric comparison used by [`Listable::get_by_value`].
///
/// ```rust
/// use biophylo_core::Comparator;
/// let cmp: Comparator = ">=".parse()?;
/// assert!(cmp.compare(2.0, 2.0));
/// assert!(!Comparator::Less.compare(2.0, 2.0));
/// # Ok::<(), strum::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize)]
pub enum Comparator {
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = ">")]
    Greater,
}

impl Comparator {
    /// Returns `true` if `value` compares true against `threshold`.
    pub fn compare(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Less => value < threshold,
            Comparator::LessOrEqual => value <= threshold,
            Comparator::Equal => value == threshold,
            Comparator::GreaterOrEqual => value >= threshold,
            Comparator::Greater => value > threshold,
        }
    }
}

// ----------------------------------------------------------------------------
// Listable
// ----------------------------------------------------------------------------

/// Membership of one [`Set`] within a container.
struct Subset {
    set: Rc<Set>,
    members: HashSet<Id>,
}

/// Resets the notification marker when a notification round ends, including on error.
struct Notifying<'l>(&'l Cell<Option<Operation>>);

#[rustfmt::skip]
impl Drop for Notifying<'_> { fn drop(&mut self) { self.0.set(None) } }

/// An ordered container of [`Entity`] handles.
///
/// - Only entities whose [`container_kind`](Entity::container_kind) equals the
///   container's [`Kind`] may be inserted.
/// - Members hold a non-owning back-reference (the owner's [`Id`]) to the container.
/// - Slots may be empty after [`insert_at`](Listable::insert_at) past the end. Empty
///   slots are skipped by iteration and lookups.
/// - Listeners run synchronously. A listener may read the container but any
///   mutation of it fails with [`Error::Reentrant`].
///
/// ## Examples
///
/// ```rust
/// use biophylo_core::{Listable, Kind, Set};
/// let list = Listable::new(0, Kind::Set);
/// assert!(list.is_empty());
/// // a set requires no container, so it cannot be inserted into a set container
/// assert!(list.insert(Set::new("A")?).is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub struct Listable {
    owner: Id,
    kind: Kind,
    entities: RefCell<Vec<Option<Handle>>>,
    cursor: Cell<Option<usize>>,
    listeners: RefCell<Vec<Listener>>,
    sets: RefCell<Vec<Subset>>,
    tracking_sets: Cell<bool>,
    notifying: Cell<Option<Operation>>,
}

impl Debug for Listable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let members = self.get_entities().iter().map(|e| e.id()).collect_vec();
        f.debug_struct("Listable")
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("members", &members)
            .field("cursor", &self.cursor.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl Listable {
    /// Returns an empty container of `kind`, owned by the entity with identifier `owner`.
    pub fn new(owner: Id, kind: Kind) -> Self {
        Listable {
            owner,
            kind,
            entities: RefCell::new(Vec::new()),
            cursor: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            sets: RefCell::new(Vec::new()),
            tracking_sets: Cell::new(false),
            notifying: Cell::new(None),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Identifier of the entity that owns this container.
    pub fn owner(&self) -> Id {
        self.owner
    }

    /// Returns an error if a listener of this container is currently running.
    fn check_mutable(&self) -> Result<(), Report> {
        match self.notifying.get() {
            Some(operation) => Err(Error::Reentrant { container: self.owner, operation })?,
            None => Ok(()),
        }
    }

    /// Returns an error if `entity` may not be held by this container.
    fn check_kind(&self, entity: &dyn Entity) -> Result<(), Report> {
        match entity.container_kind() == self.kind {
            true => Ok(()),
            false => Err(Error::KindMismatch {
                id: entity.id(),
                required: entity.container_kind(),
                container: self.kind,
            })?,
        }
    }

    /// Calls every listener in registration order, stopping at the first error.
    fn notify(&self, operation: Operation, affected: &[Handle]) -> Result<(), Report> {
        // snapshot, so listeners may register further listeners
        let listeners = self.listeners.borrow().clone();
        if listeners.is_empty() {
            return Ok(());
        }
        self.notifying.set(Some(operation));
        let _notifying = Notifying(&self.notifying);
        listeners.iter().try_for_each(|listener| listener(self, operation, affected))
    }

    /// Returns the slot position and handle of the first member with identifier `id`.
    fn find(&self, id: Id) -> Option<(usize, Handle)> {
        self.entities
            .borrow()
            .iter()
            .enumerate()
            .find_map(|(i, slot)| slot.as_ref().filter(|e| e.id() == id).map(|e| (i, e.clone())))
    }

    // ------------------------------------------------------------------------
    // Mutation

    /// Appends an entity.
    ///
    /// - Fails with [`Error::KindMismatch`] (leaving the container untouched) if the
    ///   entity's container kind differs from the container's kind.
    /// - Listeners are notified after the entity is in place. A listener error is
    ///   returned, but the entity stays inserted.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use biophylo_core::{Error, Listable, Kind, Set};
    /// let list = Listable::new(0, Kind::Tree);
    /// let report = list.insert(Set::new("A")?).unwrap_err();
    /// assert!(matches!(report.downcast_ref::<Error>(), Some(Error::KindMismatch { .. })));
    /// assert!(list.is_empty());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn insert<E: IntoHandle>(&self, entity: E) -> Result<(), Report> {
        let entity = entity.into_handle();
        self.check_mutable()?;
        self.check_kind(&*entity)?;

        self.entities.borrow_mut().push(Some(entity.clone()));
        entity.core().set_container_id(Some(self.owner));
        debug!("Inserted {} {} into {} {}", entity.kind(), entity.id(), self.kind, self.owner);

        self.notify(Operation::Insert, &[entity])
    }

    /// Places an entity at slot `index`.
    ///
    /// - Within the current slots, later members shift one slot to the right.
    /// - Past the end, the gap is padded with empty slots.
    ///
    /// Kind checking and listener semantics are those of [`insert`](Listable::insert).
    pub fn insert_at<E: IntoHandle>(&self, entity: E, index: usize) -> Result<(), Report> {
        let entity = entity.into_handle();
        self.check_mutable()?;
        self.check_kind(&*entity)?;

        {
            let mut entities = self.entities.borrow_mut();
            match index < entities.len() {
                true => {
                    entities.insert(index, Some(entity.clone()));
                    // keep the cursor on the member it pointed to
                    if let Some(cursor) = self.cursor.get().filter(|c| *c >= index) {
                        self.cursor.set(Some(cursor + 1));
                    }
                }
                false => {
                    entities.resize(index, None);
                    entities.push(Some(entity.clone()));
                }
            }
        }
        entity.core().set_container_id(Some(self.owner));
        debug!("Inserted {} {} into {} {} at {index}", entity.kind(), entity.id(), self.kind, self.owner);

        self.notify(Operation::InsertAt, &[entity])
    }

    /// Removes the first member with the same identifier as `entity`.
    ///
    /// - Fails with [`Error::NotFound`] if there is no such member.
    /// - Listeners are notified before the member is removed. If a listener fails,
    ///   the remaining listeners are skipped and the member stays in place.
    /// - A cursor on or after the removed slot moves back by one, so that
    ///   [`next`](Listable::next) continues with the member that followed.
    pub fn delete(&self, entity: &dyn Entity) -> Result<(), Report> {
        self.check_mutable()?;
        let id = entity.id();
        let (position, removed) = self
            .find(id)
            .ok_or_else(|| Error::NotFound(format!("{} {id} in {} {}", entity.kind(), self.kind, self.owner)))?;

        self.notify(Operation::Delete, &[removed.clone()])?;

        self.entities.borrow_mut().remove(position);
        if let Some(cursor) = self.cursor.get().filter(|c| *c >= position) {
            self.cursor.set(cursor.checked_sub(1));
        }
        if self.find(id).is_none() && removed.core().container_id() == Some(self.owner) {
            removed.core().set_container_id(None);
        }
        debug!("Deleted {} {id} from {} {}", removed.kind(), self.kind, self.owner);
        Ok(())
    }

    /// Removes every member and resets the cursor.
    ///
    /// Listeners are notified first, with no affected entities. If a listener
    /// fails the container is left as it was.
    pub fn clear(&self) -> Result<(), Report> {
        self.check_mutable()?;
        self.notify(Operation::Clear, &[])?;

        let removed = self.entities.borrow_mut().drain(..).flatten().collect_vec();
        self.cursor.set(None);
        removed
            .iter()
            .filter(|e| e.core().container_id() == Some(self.owner))
            .for_each(|e| e.core().set_container_id(None));
        debug!("Cleared {} members from {} {}", removed.len(), self.kind, self.owner);
        Ok(())
    }

    /// Registers a listener, called after all previously registered ones.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use biophylo_core::{Handle, Listable, Kind, Operation};
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let log = Rc::new(RefCell::new(Vec::new()));
    /// let list = Listable::new(0, Kind::Tree);
    /// let sink = log.clone();
    /// list.set_listener(move |_list: &Listable, op: Operation, _affected: &[Handle]| {
    ///     sink.borrow_mut().push(op);
    ///     Ok(())
    /// });
    /// list.clear()?;
    /// assert_eq!(*log.borrow(), [Operation::Clear]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn set_listener<F>(&self, listener: F)
    where
        F: Fn(&Listable, Operation, &[Handle]) -> Result<(), Report> + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    // ------------------------------------------------------------------------
    // Queries

    /// Returns the members in order, skipping empty slots.
    pub fn get_entities(&self) -> Vec<Handle> {
        self.entities.borrow().iter().flatten().cloned().collect()
    }

    /// Returns the number of members (empty slots are not counted).
    pub fn len(&self) -> usize {
        self.entities.borrow().iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, entity: &dyn Entity) -> bool {
        self.find(entity.id()).is_some()
    }

    /// Returns the slot of the first member with the same identifier as `entity`.
    pub fn index_of(&self, entity: &dyn Entity) -> Option<usize> {
        self.find(entity.id()).map(|(i, _)| i)
    }

    /// Returns the member in slot `index`, [`Error::OutOfBounds`] if the slot is missing or empty.
    pub fn get_by_index(&self, index: usize) -> Result<Handle, Report> {
        let entities = self.entities.borrow();
        match entities.get(index) {
            Some(Some(entity)) => Ok(entity.clone()),
            _ => Err(Error::OutOfBounds { index, len: entities.len() })?,
        }
    }

    /// Returns the members in the requested slots, failing if any slot is missing.
    ///
    /// ```rust
    /// # use biophylo_core::{Listable, Kind};
    /// let list = Listable::new(0, Kind::Tree);
    /// assert!(list.get_by_indices(0..2).is_err());
    /// assert!(list.get_by_indices([]).unwrap().is_empty());
    /// ```
    pub fn get_by_indices<I>(&self, indices: I) -> Result<Vec<Handle>, Report>
    where
        I: IntoIterator<Item = usize>,
    {
        indices.into_iter().map(|i| self.get_by_index(i)).collect()
    }

    /// Returns the first member whose name equals `name`.
    pub fn get_by_name(&self, name: &str) -> Option<Handle> {
        self.entities
            .borrow()
            .iter()
            .flatten()
            .find(|e| e.name().as_deref() == Some(name))
            .cloned()
    }

    /// Returns the members whose numeric `field` compares true against `threshold`.
    ///
    /// Members lacking the field are skipped. Zero is an ordinary value.
    pub fn get_by_value<T>(&self, field: NumericField, comparator: Comparator, threshold: T) -> Vec<Handle>
    where
        T: AsPrimitive<f64>,
    {
        let threshold = threshold.as_();
        self.get_entities()
            .into_iter()
            .filter(|e| e.numeric(field).is_some_and(|value| comparator.compare(value, threshold)))
            .collect()
    }

    /// Returns the members whose text `field` matches `regex`.
    pub fn get_by_regex(&self, field: TextField, regex: &Regex) -> Vec<Handle> {
        self.get_entities()
            .into_iter()
            .filter(|e| e.text(field).is_some_and(|text| regex.is_match(&text)))
            .collect()
    }

    /// Applies `f` to every member in order.
    ///
    /// The members are snapshotted first, so `f` may safely call back into the container.
    pub fn visit<F>(&self, f: F)
    where
        F: FnMut(&Handle),
    {
        self.get_entities().iter().for_each(f)
    }

    // ------------------------------------------------------------------------
    // Cursor

    /// Moves the cursor to the first member and returns it.
    pub fn first(&self) -> Option<Handle> {
        let found = self.entities.borrow().iter().enumerate().find_map(occupied);
        self.move_cursor(found)
    }

    /// Moves the cursor to the last member and returns it.
    pub fn last(&self) -> Option<Handle> {
        let found = self.entities.borrow().iter().enumerate().rev().find_map(occupied);
        self.move_cursor(found)
    }

    /// Returns the member under the cursor, [`None`] if the cursor is unset.
    pub fn current(&self) -> Option<Handle> {
        let cursor = self.cursor.get()?;
        self.entities.borrow().get(cursor).cloned().flatten()
    }

    /// Advances the cursor and returns the member it lands on.
    ///
    /// From an unset cursor this is the first member. Past the last member it
    /// returns [`None`] and the cursor stays where it was.
    ///
    /// ```rust
    /// # use biophylo_core::{Listable, Kind};
    /// let list = Listable::new(0, Kind::Tree);
    /// assert!(list.next().is_none());
    /// assert!(list.current().is_none());
    /// ```
    pub fn next(&self) -> Option<Handle> {
        let start = self.cursor.get().map_or(0, |c| c + 1);
        let found = self.entities.borrow().iter().enumerate().skip(start).find_map(occupied);
        self.move_cursor(found)
    }

    /// Moves the cursor back and returns the member it lands on.
    ///
    /// From the first member, or an unset cursor, returns [`None`].
    pub fn previous(&self) -> Option<Handle> {
        let end = self.cursor.get()?;
        let found = self.entities.borrow().iter().enumerate().take(end).rev().find_map(occupied);
        self.move_cursor(found)
    }

    /// Unsets the cursor.
    pub fn reset_cursor(&self) {
        self.cursor.set(None)
    }

    fn move_cursor(&self, found: Option<(usize, Handle)>) -> Option<Handle> {
        let (i, entity) = found?;
        self.cursor.set(Some(i));
        Some(entity)
    }

    // ------------------------------------------------------------------------
    // Sets

    /// Associates a [`Set`] with the container. Adding the same set twice is a no-op.
    ///
    /// The first association registers a listener that keeps set memberships in
    /// sync with deletions and clears.
    pub fn add_set(&self, set: &Rc<Set>) {
        if !self.tracking_sets.replace(true) {
            self.set_listener(track_sets);
        }
        let mut sets = self.sets.borrow_mut();
        if !sets.iter().any(|s| s.set.id() == set.id()) {
            debug!("Added set {} to {} {}", set.id(), self.kind, self.owner);
            sets.push(Subset { set: set.clone(), members: HashSet::new() });
        }
    }

    /// Removes a [`Set`] and its memberships, [`Error::NotFound`] if it was never added.
    pub fn remove_set(&self, set: &Set) -> Result<(), Report> {
        let mut sets = self.sets.borrow_mut();
        let position = sets
            .iter()
            .position(|s| s.set.id() == set.id())
            .ok_or_else(|| self.unknown_set(set))?;
        sets.remove(position);
        Ok(())
    }

    /// Returns the associated sets, in the order they were added.
    pub fn get_sets(&self) -> Vec<Rc<Set>> {
        self.sets.borrow().iter().map(|s| s.set.clone()).collect()
    }

    /// Returns `true` if `entity` is a member of `set`.
    ///
    /// Fails with [`Error::NotFound`] if `set` is not associated with the container.
    pub fn is_in_set(&self, entity: &dyn Entity, set: &Set) -> Result<bool, Report> {
        self.with_subset(set, |subset| subset.members.contains(&entity.id()))
    }

    /// Adds a member to `set`, associating the set first if needed.
    ///
    /// Fails with [`Error::NotFound`] if `entity` is not a member of the container.
    pub fn add_to_set(&self, entity: &dyn Entity, set: &Rc<Set>) -> Result<(), Report> {
        if !self.contains(entity) {
            Err(Error::NotFound(format!("{} {} in {} {}", entity.kind(), entity.id(), self.kind, self.owner)))?
        }
        self.add_set(set);
        self.with_subset(set, |subset| subset.members.insert(entity.id()))?;
        Ok(())
    }

    /// Removes `entity` from `set`. Removing a non-member is a no-op.
    pub fn remove_from_set(&self, entity: &dyn Entity, set: &Set) -> Result<(), Report> {
        self.with_subset(set, |subset| subset.members.remove(&entity.id()))?;
        Ok(())
    }

    /// Returns the members of `set`, in container order.
    pub fn get_set_members(&self, set: &Set) -> Result<Vec<Handle>, Report> {
        let members = self.with_subset(set, |subset| subset.members.clone())?;
        Ok(self.get_entities().into_iter().filter(|e| members.contains(&e.id())).collect())
    }

    fn with_subset<F, T>(&self, set: &Set, f: F) -> Result<T, Report>
    where
        F: FnOnce(&mut Subset) -> T,
    {
        let mut sets = self.sets.borrow_mut();
        match sets.iter_mut().find(|s| s.set.id() == set.id()) {
            Some(subset) => Ok(f(subset)),
            None => Err(self.unknown_set(set))?,
        }
    }

    fn unknown_set(&self, set: &Set) -> Error {
        Error::NotFound(format!("set {} in {} {}", set.id(), self.kind, self.owner))
    }
}

fn occupied((i, slot): (usize, &Option<Handle>)) -> Option<(usize, Handle)> {
    slot.as_ref().map(|e| (i, e.clone()))
}

/// Listener that drops deleted or cleared members from every set.
///
/// Runs before the deletion, so a member held in more than one slot keeps its
/// memberships until its last copy is deleted.
fn track_sets(list: &Listable, operation: Operation, affected: &[Handle]) -> Result<(), Report> {
    match operation {
        Operation::Delete => affected.iter().for_each(|e| {
            let copies = list.entities.borrow().iter().flatten().filter(|m| m.id() == e.id()).count();
            if copies <= 1 {
                list.sets.borrow_mut().iter_mut().for_each(|s| {
                    s.members.remove(&e.id());
                })
            }
        }),
        Operation::Clear => list.sets.borrow_mut().iter_mut().for_each(|s| s.members.clear()),
        Operation::Insert | Operation::InsertAt => (),
    }
    Ok(())
}
