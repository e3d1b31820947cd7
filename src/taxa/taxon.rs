use crate::{utils, Datum, Node, Taxa};
use biophylo_core::{downcast, identity, Core, Entity, Kind};
use color_eyre::eyre::{Report, Result};
use std::any::Any;
use std::rc::Rc;

/// An operational taxonomic unit.
///
/// Nodes and matrix rows refer to a [`Taxon`] through the mediator, so a
/// taxon never owns them and can be queried for them at any time.
#[derive(Debug)]
pub struct Taxon {
    core: Core,
}

impl Taxon {
    /// Returns a new named [`Taxon`].
    ///
    /// ```rust
    /// use biophylo::{Entity, Taxon};
    /// let taxon = Taxon::new("Homo_sapiens")?;
    /// assert_eq!(taxon.name().as_deref(), Some("Homo_sapiens"));
    /// assert!(Taxon::new("Homo sapiens;").is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn new(name: &str) -> Result<Rc<Taxon>, Report> {
        Ok(identity::install(Taxon { core: Core::with_name(name)? }))
    }

    /// Returns the live nodes this taxon is assigned to.
    pub fn get_nodes(&self) -> Vec<Rc<Node>> {
        utils::linked(self, Kind::Node)
    }

    /// Returns the live matrix rows this taxon is assigned to.
    pub fn get_data(&self) -> Vec<Rc<Datum>> {
        utils::linked(self, Kind::Datum)
    }

    /// Returns the taxon set holding this taxon.
    pub fn get_taxa(&self) -> Option<Rc<Taxa>> {
        self.container().as_ref().and_then(downcast::<Taxa>)
    }
}

impl Entity for Taxon {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Taxon }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::TaxonSet }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
}
