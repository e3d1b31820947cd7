//! Phylogenetic trees: the [`Forest`], its [`Tree`]s and their [`Node`]s.

mod node;
mod tree;

#[cfg(test)]
mod tests;

pub use node::Node;
pub use tree::Tree;

use crate::taxa::TaxaLinker;
use crate::utils;
use biophylo_core::{identity, Core, Entity, Kind, Listable};
use color_eyre::eyre::{Report, Result};
use std::any::Any;
use std::rc::Rc;

/// An ordered collection of [`Tree`]s over a common set of taxa.
///
/// ```rust
/// use biophylo::{FromNewick, Forest, Taxa, TaxaLinker};
/// let forest = Forest::from_newick("(A,B);\n(B,A);")?;
/// let taxa = Taxa::from_names(["A", "B"])?;
/// forest.set_taxa(&taxa)?;
///
/// assert_eq!(forest.get_trees().len(), 2);
/// assert_eq!(taxa.get_forests().len(), 1);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug)]
pub struct Forest {
    core: Core,
    list: Listable,
}

impl Forest {
    /// Returns a new empty [`Forest`].
    pub fn new() -> Rc<Forest> {
        let core = Core::new();
        let list = Listable::new(core.id(), Kind::Forest);
        identity::install(Forest { core, list })
    }

    /// The underlying container.
    pub fn list(&self) -> &Listable {
        &self.list
    }

    pub fn insert(&self, tree: &Rc<Tree>) -> Result<(), Report> {
        self.list.insert(tree.clone())
    }

    pub fn get_trees(&self) -> Vec<Rc<Tree>> {
        utils::members(&self.list)
    }

    /// Returns the nodes of every tree, tree by tree.
    pub fn get_nodes(&self) -> Vec<Rc<Node>> {
        self.get_trees().iter().flat_map(|t| t.get_nodes()).collect()
    }
}

impl Entity for Forest {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Forest }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::None }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
    #[rustfmt::skip]
    fn listable(&self) -> Option<&Listable> { Some(&self.list) }
}

impl TaxaLinker for Forest {}
