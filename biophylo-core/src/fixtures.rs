//! Minimal entities for exercising containers and the mediator in unit tests.

use crate::{identity, Core, Entity, Kind, Listable, NumericField};
use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct Member {
    core: Core,
    kind: Kind,
    container_kind: Kind,
    list: Option<Listable>,
    pub(crate) length: Cell<Option<f64>>,
}

impl Member {
    pub(crate) fn build(name: &str, kind: Kind, container_kind: Kind, holds: Option<Kind>) -> Rc<Member> {
        let core = Core::with_name(name).expect("fixture names are valid");
        let list = holds.map(|k| Listable::new(core.id(), k));
        identity::install(Member { core, kind, container_kind, list, length: Cell::new(None) })
    }
}

impl Entity for Member {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { self.kind }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { self.container_kind }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }

    fn listable(&self) -> Option<&Listable> {
        self.list.as_ref()
    }

    fn accepts_taxon(&self) -> bool {
        matches!(self.kind, Kind::Node | Kind::Datum)
    }

    fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Score => self.core.score(),
            NumericField::BranchLength => self.length.get(),
            _ => None,
        }
    }
}

pub(crate) fn node(name: &str) -> Rc<Member> {
    Member::build(name, Kind::Node, Kind::Tree, None)
}

pub(crate) fn tree(name: &str) -> Rc<Member> {
    Member::build(name, Kind::Tree, Kind::Forest, Some(Kind::Tree))
}

pub(crate) fn forest(name: &str) -> Rc<Member> {
    Member::build(name, Kind::Forest, Kind::None, Some(Kind::Forest))
}

pub(crate) fn taxon(name: &str) -> Rc<Member> {
    Member::build(name, Kind::Taxon, Kind::TaxonSet, None)
}

pub(crate) fn taxa(name: &str) -> Rc<Member> {
    Member::build(name, Kind::TaxonSet, Kind::None, Some(Kind::TaxonSet))
}

pub(crate) fn datum(name: &str) -> Rc<Member> {
    Member::build(name, Kind::Datum, Kind::Matrix, None)
}

pub(crate) fn matrix(name: &str) -> Rc<Member> {
    Member::build(name, Kind::Matrix, Kind::None, Some(Kind::Matrix))
}

/// Returns the member list of a fixture container.
pub(crate) fn list(member: &Member) -> &Listable {
    member.listable().expect("fixture is a container")
}

/// Returns the identifiers of `handles`, in order.
pub(crate) fn ids<E: Entity + ?Sized>(handles: &[Rc<E>]) -> Vec<crate::Id> {
    handles.iter().map(|h| h.id()).collect()
}
