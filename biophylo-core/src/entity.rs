//! The [`Entity`] capability shared by every domain object.

use crate::{identity, mediator, Error, Id, Listable};
use color_eyre::eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use strum::{Display, EnumIter, EnumString};

/// Shared, type-erased handle to a live entity.
pub type Handle = Rc<dyn Entity>;

/// Characters that would break downstream text formats when used in a name.
pub const RESERVED_NAME_CHARS: &[char] = &['(', ')', '[', ']', ',', ':', ';', '\'', '"'];

// ----------------------------------------------------------------------------
// Kind
// ----------------------------------------------------------------------------

/// The category of an [`Entity`].
///
/// ```rust
/// use biophylo_core::Kind;
/// use std::str::FromStr;
/// assert_eq!(Kind::TaxonSet.to_string(), "TAXON_SET");
/// assert_eq!(Kind::from_str("MATRIX")?, Kind::Matrix);
/// # Ok::<(), strum::ParseError>(())
/// ```
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, EnumString, Eq, Hash, Ord,
    PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    #[default]
    None,
    Node,
    Tree,
    Forest,
    Taxon,
    TaxonSet,
    Datum,
    Matrix,
    MatrixSet,
    Sequence,
    Alignment,
    Set,
}

/// Numeric accessors available to [`Listable::get_by_value`].
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NumericField {
    /// [`Entity::score`], available on every entity.
    Score,
    /// Length of the branch subtending a node.
    BranchLength,
    /// Weight of a matrix row.
    Weight,
    /// Position of a matrix row.
    Position,
}

/// Text accessors available to [`Listable::get_by_regex`].
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TextField {
    Name,
    Description,
}

// ----------------------------------------------------------------------------
// Core
// ----------------------------------------------------------------------------

/// Fields every [`Entity`] carries.
///
/// Domain types embed a [`Core`] and hand it out through [`Entity::core`].
/// Dropping a [`Core`] retires its identifier and removes its mediator links.
pub struct Core {
    id: Id,
    name: RefCell<Option<String>>,
    description: RefCell<Option<String>>,
    score: Cell<Option<f64>>,
    generic: RefCell<BTreeMap<String, Value>>,
    container: Cell<Option<Id>>,
}

#[rustfmt::skip]
impl Default for Core { fn default() -> Self { Self::new() } }

impl Debug for Core {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("id", &self.id)
            .field("name", &self.name.borrow())
            .field("container", &self.container.get())
            .finish()
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        identity::retire(self.id);
        mediator::forget(self.id);
    }
}

impl Core {
    /// Returns an empty [`Core`] with a freshly allocated identifier.
    pub fn new() -> Self {
        Core {
            id: identity::allocate(),
            name: RefCell::new(None),
            description: RefCell::new(None),
            score: Cell::new(None),
            generic: RefCell::new(BTreeMap::new()),
            container: Cell::new(None),
        }
    }

    /// Returns a [`Core`] with a validated name.
    pub fn with_name(name: &str) -> Result<Self, Report> {
        let core = Core::new();
        core.set_name(name)?;
        Ok(core)
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    /// Sets the name, rejecting empty names and names with reserved characters.
    pub fn set_name(&self, name: &str) -> Result<(), Report> {
        validate_name(name)?;
        *self.name.borrow_mut() = Some(name.to_string());
        Ok(())
    }

    pub fn clear_name(&self) {
        *self.name.borrow_mut() = None;
    }

    pub fn description(&self) -> Option<String> {
        self.description.borrow().clone()
    }

    pub fn set_description(&self, description: &str) {
        *self.description.borrow_mut() = Some(description.to_string());
    }

    pub fn score(&self) -> Option<f64> {
        self.score.get()
    }

    pub fn set_score(&self, score: Option<f64>) {
        self.score.set(score);
    }

    pub fn generic(&self, key: &str) -> Option<Value> {
        self.generic.borrow().get(key).cloned()
    }

    /// Stores an annotation under `key`, returning the previous value.
    pub fn set_generic(&self, key: &str, value: Value) -> Result<Option<Value>, Report> {
        if key.is_empty() {
            Err(Error::BadArgument("annotation keys must not be empty".to_string()))?
        }
        Ok(self.generic.borrow_mut().insert(key.to_string(), value))
    }

    pub fn generics(&self) -> BTreeMap<String, Value> {
        self.generic.borrow().clone()
    }

    pub(crate) fn container_id(&self) -> Option<Id> {
        self.container.get()
    }

    pub(crate) fn set_container_id(&self, container: Option<Id>) {
        self.container.set(container);
    }
}

/// Checks that a name is usable in text formats.
///
/// ```rust
/// use biophylo_core::entity::validate_name;
/// assert!(validate_name("Homo_sapiens").is_ok());
/// assert!(validate_name("A,B").is_err());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), Report> {
    if name.is_empty() {
        Err(Error::BadArgument("names must not be empty".to_string()))?
    }
    match name.chars().find(|c| RESERVED_NAME_CHARS.contains(c) || c.is_control()) {
        Some(c) => Err(Error::BadArgument(format!("name {name:?} contains reserved character {c:?}")))?,
        None => Ok(()),
    }
}

// ----------------------------------------------------------------------------
// Entity
// ----------------------------------------------------------------------------

/// Base capability of every domain object.
///
/// Implementors provide their [`Core`], their [`Kind`] and the kind of container
/// that may hold them. Optional capabilities (being a container, accepting a
/// taxon, exposing numeric fields) have defaults that implementors override.
pub trait Entity: Any + Debug {
    fn core(&self) -> &Core;

    fn kind(&self) -> Kind;

    /// The kind of [`Listable`] this entity may be inserted into.
    fn container_kind(&self) -> Kind;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;

    /// Returns the entity's members, if it is a container.
    fn listable(&self) -> Option<&Listable> {
        None
    }

    /// Returns `true` if a taxon can be assigned to this entity.
    fn accepts_taxon(&self) -> bool {
        false
    }

    /// Returns the value of a numeric accessor, [`None`] if the entity lacks it.
    fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Score => self.core().score(),
            _ => None,
        }
    }

    fn id(&self) -> Id {
        self.core().id()
    }

    fn name(&self) -> Option<String> {
        self.core().name()
    }

    fn set_name(&self, name: &str) -> Result<(), Report> {
        self.core().set_name(name)
    }

    fn description(&self) -> Option<String> {
        self.core().description()
    }

    fn set_description(&self, description: &str) {
        self.core().set_description(description)
    }

    fn score(&self) -> Option<f64> {
        self.core().score()
    }

    fn set_score(&self, score: Option<f64>) {
        self.core().set_score(score)
    }

    fn generic(&self, key: &str) -> Option<Value> {
        self.core().generic(key)
    }

    fn set_generic(&self, key: &str, value: Value) -> Result<Option<Value>, Report> {
        self.core().set_generic(key, value)
    }

    fn text(&self, field: TextField) -> Option<String> {
        match field {
            TextField::Name => self.name(),
            TextField::Description => self.description(),
        }
    }

    /// Returns the container currently holding this entity, if it is still alive.
    fn container(&self) -> Option<Handle> {
        self.core().container_id().and_then(identity::resolve)
    }
}

/// Conversion of typed and type-erased entity handles into a [`Handle`].
pub trait IntoHandle {
    fn into_handle(self) -> Handle;
}

#[rustfmt::skip]
impl<T: Entity> IntoHandle for Rc<T> { fn into_handle(self) -> Handle { self } }
#[rustfmt::skip]
impl IntoHandle for Handle { fn into_handle(self) -> Handle { self } }

/// Returns the concrete entity behind a [`Handle`], if it is a `T`.
///
/// ```rust
/// use biophylo_core::{downcast, Handle, Set, IntoHandle};
/// let handle: Handle = Set::new("clade")?.into_handle();
/// assert!(downcast::<Set>(&handle).is_some());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn downcast<T: Entity>(handle: &Handle) -> Option<Rc<T>> {
    handle.clone().into_any().downcast::<T>().ok()
}
