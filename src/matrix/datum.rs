use crate::taxa::TaxonLinker;
use crate::Matrix;
use biophylo_core::{downcast, identity, Core, Entity, Kind, NumericField};
use color_eyre::eyre::{Report, Result};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One row of a [`Matrix`]: the character states observed for a taxon.
///
/// ```rust
/// use biophylo::{Datum, Entity, NumericField};
/// let row = Datum::new("A", "ACGT-")?;
/// row.set_weight(Some(0.0));
/// assert_eq!(row.get_length(), 5);
/// assert_eq!(row.numeric(NumericField::Weight), Some(0.0));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug)]
pub struct Datum {
    core: Core,
    chars: RefCell<String>,
    weight: Cell<Option<f64>>,
    position: Cell<Option<usize>>,
}

impl Datum {
    /// Returns a new named row holding `chars`.
    pub fn new(name: &str, chars: &str) -> Result<Rc<Datum>, Report> {
        Ok(identity::install(Datum {
            core: Core::with_name(name)?,
            chars: RefCell::new(chars.to_string()),
            weight: Cell::new(None),
            position: Cell::new(None),
        }))
    }

    pub fn get_chars(&self) -> String {
        self.chars.borrow().clone()
    }

    pub fn set_chars(&self, chars: &str) {
        *self.chars.borrow_mut() = chars.to_string();
    }

    /// Returns the number of characters.
    pub fn get_length(&self) -> usize {
        self.chars.borrow().chars().count()
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight.get()
    }

    pub fn set_weight(&self, weight: Option<f64>) {
        self.weight.set(weight);
    }

    /// Position of the first character within the full alignment (1-based).
    pub fn position(&self) -> Option<usize> {
        self.position.get()
    }

    pub fn set_position(&self, position: Option<usize>) {
        self.position.set(position);
    }

    /// Returns the matrix holding this row.
    pub fn get_matrix(&self) -> Option<Rc<Matrix>> {
        self.container().as_ref().and_then(downcast::<Matrix>)
    }
}

impl Entity for Datum {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Datum }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::Matrix }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
    #[rustfmt::skip]
    fn accepts_taxon(&self) -> bool { true }

    fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Score => self.score(),
            NumericField::Weight => self.weight(),
            NumericField::Position => self.position().map(|p| p as f64),
            NumericField::BranchLength => None,
        }
    }
}

impl TaxonLinker for Datum {}
