//! `biophylo` models phylogenetic data as shared, cross-referenced objects.
//!
//! Forests of trees and character matrices refer to a common set of taxa
//! without owning them. The object model itself (identities, containers and the
//! taxon links) lives in [`biophylo_core`]; this crate adds the phylogenetic
//! types on top of it:
//!
//! - [`Taxa`] and [`Taxon`]: the operational taxonomic units.
//! - [`Forest`], [`Tree`] and [`Node`]: rooted trees read from and written to [Newick](https://en.wikipedia.org/wiki/Newick_format).
//! - [`Matrix`] and [`Datum`]: one row of characters per taxon.
//!
//! ## Example
//!
//! ```rust
//! use biophylo::{Entity, Forest, FromNewick, Taxa, TaxaLinker};
//!
//! let forest = Forest::from_newick("((A:1,B:2)AB:0.5,C:3);")?;
//! let taxa = Taxa::from_names(["A", "B", "C"])?;
//!
//! let assigned = forest.cross_reference(&taxa)?;
//! assert_eq!(assigned, 3);
//!
//! let a = taxa.get_by_name("A").unwrap();
//! let node = &a.get_nodes()[0];
//! assert_eq!(node.name().as_deref(), Some("A"));
//! assert_eq!(node.branch_length(), Some(1.0));
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

pub mod cli;
pub mod forest;
pub mod matrix;
pub mod newick;
pub mod run;
pub mod table;
pub mod taxa;
mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::forest::{Forest, Node, Tree};
#[doc(inline)]
pub use crate::matrix::{Datum, Matrix};
#[doc(inline)]
pub use crate::table::Table;
#[doc(inline)]
pub use crate::taxa::{Taxa, TaxaLinker, Taxon, TaxonLinker};
#[doc(inline)]
pub use crate::utils::verbosity::Verbosity;
#[doc(inline)]
pub use biophylo_core::{Comparator, Entity, Error, Kind, NumericField, TextField};

use color_eyre::eyre::{Report, Result};
use std::rc::Rc;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Returns a shared object created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`str`].
pub trait FromNewick {
    fn from_newick(newick: &str) -> Result<Rc<Self>, Report>;
}

/// Returns a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`str`] created from an object.
pub trait ToNewick {
    fn to_newick(&self) -> Result<String, Report>;
}
