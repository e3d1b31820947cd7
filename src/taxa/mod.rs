//! Taxa: the [`Taxon`] and the [`Taxa`] set shared by forests and matrices.

mod taxon;

#[cfg(test)]
mod tests;

pub use taxon::Taxon;

use crate::{utils, Forest, Matrix, Tree};
use biophylo_core::{cross_reference, identity, mediator, Core, Entity, Error, Kind, Listable};
use color_eyre::eyre::{Report, Result, WrapErr};
use log::debug;
use std::any::Any;
use std::rc::Rc;

// ----------------------------------------------------------------------------
// Taxa
// ----------------------------------------------------------------------------

/// An ordered set of uniquely named [`Taxon`].
///
/// A taxon set is linked to the forests, trees and matrices that describe its
/// taxa. The links do not keep either side alive.
///
/// ```rust
/// use biophylo::{Entity, Taxa};
/// let taxa = Taxa::from_names(["A", "B", "C"])?;
/// assert_eq!(taxa.get_taxa().len(), 3);
/// assert_eq!(taxa.get_by_name("B").and_then(|t| t.name()).as_deref(), Some("B"));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug)]
pub struct Taxa {
    core: Core,
    list: Listable,
}

impl Taxa {
    /// Returns a new empty [`Taxa`].
    pub fn new() -> Rc<Taxa> {
        let core = Core::new();
        let list = Listable::new(core.id(), Kind::TaxonSet);
        identity::install(Taxa { core, list })
    }

    /// Returns a new [`Taxa`] with one [`Taxon`] per name, in order.
    pub fn from_names<I, S>(names: I) -> Result<Rc<Taxa>, Report>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let taxa = Taxa::new();
        for name in names {
            let name = name.as_ref();
            let taxon = Taxon::new(name).wrap_err_with(|| format!("Failed to create taxon {name:?}"))?;
            taxa.insert(&taxon)?;
        }
        debug!("Created taxon set {} with {} taxa", taxa.id(), taxa.list.len());
        Ok(taxa)
    }

    /// The underlying container.
    pub fn list(&self) -> &Listable {
        &self.list
    }

    /// Appends `taxon`, failing with [`Error::Duplicate`] if a taxon of the same name is present.
    pub fn insert(&self, taxon: &Rc<Taxon>) -> Result<(), Report> {
        if let Some(name) = taxon.name() {
            if self.list.get_by_name(&name).is_some_and(|t| t.id() != taxon.id()) {
                Err(Error::Duplicate(format!("taxon set {} already has a taxon named {name:?}", self.id())))?
            }
        }
        self.list.insert(taxon.clone())
    }

    pub fn get_taxa(&self) -> Vec<Rc<Taxon>> {
        utils::members(&self.list)
    }

    pub fn get_by_name(&self, name: &str) -> Option<Rc<Taxon>> {
        self.list.get_by_name(name).as_ref().and_then(biophylo_core::downcast::<Taxon>)
    }

    /// Returns the live forests linked to this taxon set.
    pub fn get_forests(&self) -> Vec<Rc<Forest>> {
        utils::linked(self, Kind::Forest)
    }

    /// Returns the live trees linked to this taxon set.
    pub fn get_trees(&self) -> Vec<Rc<Tree>> {
        utils::linked(self, Kind::Tree)
    }

    /// Returns the live matrices linked to this taxon set.
    pub fn get_matrices(&self) -> Vec<Rc<Matrix>> {
        utils::linked(self, Kind::Matrix)
    }
}

impl Entity for Taxa {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::TaxonSet }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::None }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
    #[rustfmt::skip]
    fn listable(&self) -> Option<&Listable> { Some(&self.list) }
}

// ----------------------------------------------------------------------------
// Linkers
// ----------------------------------------------------------------------------

/// Collections that refer to a [`Taxa`] set: forests, trees and matrices.
pub trait TaxaLinker: Entity + Sized {
    /// Links this collection to `taxa`, replacing any previous taxon set.
    fn set_taxa(&self, taxa: &Taxa) -> Result<(), Report> {
        mediator::link(taxa, self)
    }

    fn get_taxa(&self) -> Option<Rc<Taxa>> {
        utils::linked_source(self, Kind::TaxonSet)
    }

    fn unset_taxa(&self) {
        if let Some(taxa) = self.get_taxa() {
            mediator::unlink(&*taxa, self);
        }
    }

    /// Assigns every member the taxon of `taxa` with the same name, returning
    /// the number of members assigned.
    fn cross_reference(&self, taxa: &Taxa) -> Result<usize, Report> {
        cross_reference(self, taxa)
    }
}

/// Members that refer to a single [`Taxon`]: nodes and matrix rows.
pub trait TaxonLinker: Entity + Sized {
    /// Assigns `taxon`, replacing any previous one.
    fn set_taxon(&self, taxon: &Taxon) -> Result<(), Report> {
        mediator::link(taxon, self)
    }

    fn get_taxon(&self) -> Option<Rc<Taxon>> {
        utils::linked_source(self, Kind::Taxon)
    }

    fn unset_taxon(&self) {
        if let Some(taxon) = self.get_taxon() {
            mediator::unlink(&*taxon, self);
        }
    }
}
