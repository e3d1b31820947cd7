//! Character data: the [`Matrix`] and its [`Datum`] rows.

mod datum;


pub use datum::Datum;

use crate::taxa::{TaxaLinker, TaxonLinker};
use crate::{utils, Taxon};
use biophylo_core::{identity, Core, Entity, Error, Kind, Listable};
use color_eyre::eyre::{Report, Result};
use std::any::Any;
use std::rc::Rc;

/// A character matrix holding at most one [`Datum`] per [`Taxon`].
///
/// ```rust
/// use biophylo::{Datum, Matrix, TaxonLinker, Taxon};
/// let matrix = Matrix::new();
/// let taxon = Taxon::new("A")?;
/// let (first, second) = (Datum::new("A", "ACGT")?, Datum::new("A2", "ACGA")?);
/// first.set_taxon(&taxon)?;
/// second.set_taxon(&taxon)?;
///
/// matrix.insert(&first)?;
/// assert!(matrix.insert(&second).is_err());
/// assert_eq!(matrix.get_ntax(), 1);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug)]
pub struct Matrix {
    core: Core,
    list: Listable,
}

impl Matrix {
    /// Returns a new empty [`Matrix`].
    pub fn new() -> Rc<Matrix> {
        let core = Core::new();
        let list = Listable::new(core.id(), Kind::Matrix);
        identity::install(Matrix { core, list })
    }

    /// The underlying container.
    pub fn list(&self) -> &Listable {
        &self.list
    }

    /// Appends `datum`.
    ///
    /// Fails with [`Error::Duplicate`] if another row is already assigned the same taxon.
    pub fn insert(&self, datum: &Rc<Datum>) -> Result<(), Report> {
        if let Some(taxon) = datum.get_taxon() {
            if let Some(other) = self.get_by_taxon(&taxon).filter(|d| d.id() != datum.id()) {
                Err(Error::Duplicate(format!(
                    "matrix {} already has row {} for taxon {:?}",
                    self.id(),
                    other.id(),
                    taxon.name().unwrap_or_default()
                )))?
            }
        }
        self.list.insert(datum.clone())
    }

    pub fn get_data(&self) -> Vec<Rc<Datum>> {
        utils::members(&self.list)
    }

    /// Returns the row assigned `taxon`.
    pub fn get_by_taxon(&self, taxon: &Taxon) -> Option<Rc<Datum>> {
        self.get_data().into_iter().find(|d| d.get_taxon().is_some_and(|t| t.id() == taxon.id()))
    }

    /// Returns the number of rows.
    pub fn get_ntax(&self) -> usize {
        self.list.len()
    }

    /// Returns the length of the longest row.
    pub fn get_nchar(&self) -> usize {
        self.get_data().iter().map(|d| d.get_length()).max().unwrap_or_default()
    }
}

impl Entity for Matrix {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Matrix }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::None }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
    #[rustfmt::skip]
    fn listable(&self) -> Option<&Listable> { Some(&self.list) }
}

impl TaxaLinker for Matrix {}
