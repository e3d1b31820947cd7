use crate::{identity, Core, Entity, Kind};
use color_eyre::eyre::{Report, Result};
use std::any::Any;
use std::rc::Rc;

/// A named subset of a [`Listable`](crate::Listable)'s members.
///
/// The [`Set`] itself holds no members; each container records which of its
/// own members belong to which of its sets.
#[derive(Debug)]
pub struct Set {
    core: Core,
}

impl Set {
    /// Returns a new named [`Set`].
    ///
    /// ```rust
    /// use biophylo_core::{Entity, Set};
    /// let set = Set::new("outgroup")?;
    /// assert_eq!(set.name().as_deref(), Some("outgroup"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn new(name: &str) -> Result<Rc<Set>, Report> {
        Ok(identity::install(Set { core: Core::with_name(name)? }))
    }
}

impl Entity for Set {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Set }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::None }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
}
