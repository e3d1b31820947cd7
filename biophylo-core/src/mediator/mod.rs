//! Non-owning links between taxa and the collections that refer to them.
//!
//! A forest or matrix never stores its taxon set, and a node or row never
//! stores its taxon. The association lives here, keyed by [`Id`], so either
//! side can be dropped independently:
//!
//! - `TAXON_SET → FOREST | MATRIX | TREE`
//! - `TAXON → NODE | DATUM`
//!
//! Each target has at most one source of a given kind. Linking a target to a
//! new source replaces the previous link.
//!
//! ```rust
//! use biophylo_core::{mediator, Entity, Kind};
//! # use biophylo_core::Set;
//! // no links exist for a fresh entity
//! let set = Set::new("A")?;
//! assert!(mediator::get_links(&*set, Kind::Forest).is_empty());
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

use crate::{identity, Entity, Error, Handle, Id, Kind, Listable};
use color_eyre::eyre::{Report, Result, WrapErr};
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use strum::IntoEnumIterator;

#[cfg(test)]
mod tests;

thread_local! {
    static MEDIATOR: RefCell<Mediator> = RefCell::new(Mediator::default());
}

/// The link table.
#[derive(Debug, Default)]
struct Mediator {
    /// Source → targets, ordered by identifier (i.e. creation order).
    targets: HashMap<Id, BTreeSet<Id>>,
    /// (Target, source kind) → source.
    sources: HashMap<(Id, Kind), Id>,
    /// Kind of every identifier that takes part in a link.
    kinds: HashMap<Id, Kind>,
}

impl Mediator {
    fn link(&mut self, source: (Id, Kind), target: (Id, Kind)) -> bool {
        let key = (target.0, source.1);
        match self.sources.insert(key, source.0) {
            Some(previous) if previous == source.0 => return false,
            Some(previous) => {
                if let Some(targets) = self.targets.get_mut(&previous) {
                    targets.remove(&target.0);
                }
            }
            None => (),
        }
        self.targets.entry(source.0).or_default().insert(target.0);
        self.kinds.insert(source.0, source.1);
        self.kinds.insert(target.0, target.1);
        true
    }

    fn unlink(&mut self, source: (Id, Kind), target: Id) -> bool {
        let key = (target, source.1);
        match self.sources.get(&key) == Some(&source.0) {
            true => {
                self.sources.remove(&key);
                if let Some(targets) = self.targets.get_mut(&source.0) {
                    targets.remove(&target);
                }
                true
            }
            false => false,
        }
    }

    fn targets_of(&self, source: Id, of_kind: Kind) -> Vec<Id> {
        self.targets
            .get(&source)
            .into_iter()
            .flatten()
            .filter(|t| self.kinds.get(*t) == Some(&of_kind))
            .copied()
            .collect()
    }

    fn forget(&mut self, id: Id) {
        let Some(kind) = self.kinds.remove(&id) else {
            return;
        };
        // as a source
        if let Some(targets) = self.targets.remove(&id) {
            targets.iter().for_each(|t| {
                self.sources.remove(&(*t, kind));
            });
        }
        // as a target, one key per kind of source that may link to it
        for source_kind in Kind::iter().filter(|s| is_linkable(*s, kind)) {
            if let Some(source) = self.sources.remove(&(id, source_kind)) {
                if let Some(targets) = self.targets.get_mut(&source) {
                    targets.remove(&id);
                }
            }
        }
    }

    fn count(&self) -> usize {
        self.sources.len()
    }
}

fn with_mediator<F, T>(f: F) -> T
where
    F: FnOnce(&mut Mediator) -> T,
{
    MEDIATOR.with(|mediator| f(&mut mediator.borrow_mut()))
}

/// Returns `true` if a link from a `source` kind to a `target` kind is meaningful.
pub fn is_linkable(source: Kind, target: Kind) -> bool {
    matches!(
        (source, target),
        (Kind::TaxonSet, Kind::Forest | Kind::Matrix | Kind::Tree) | (Kind::Taxon, Kind::Node | Kind::Datum)
    )
}

fn check_linkable(source: &dyn Entity, target: &dyn Entity) -> Result<(), Report> {
    match is_linkable(source.kind(), target.kind()) {
        true => Ok(()),
        false => Err(Error::ObjectMismatch(format!(
            "{} {} cannot be linked to {} {}",
            source.kind(),
            source.id(),
            target.kind(),
            target.id()
        )))?,
    }
}

/// Records a non-owning link from `source` to `target`.
///
/// - Re-linking the same pair is a no-op.
/// - A target linked to another source of the same kind is moved to `source`.
/// - Fails with [`Error::ObjectMismatch`] for kind pairs that cannot be linked.
pub fn link(source: &dyn Entity, target: &dyn Entity) -> Result<(), Report> {
    check_linkable(source, target)?;
    let changed = with_mediator(|m| m.link((source.id(), source.kind()), (target.id(), target.kind())));
    if changed {
        debug!("Linked {} {} to {} {}", source.kind(), source.id(), target.kind(), target.id());
    }
    Ok(())
}

/// Removes the link from `source` to `target`, if there is one.
pub fn unlink(source: &dyn Entity, target: &dyn Entity) {
    if with_mediator(|m| m.unlink((source.id(), source.kind()), target.id())) {
        debug!("Unlinked {} {} from {} {}", source.kind(), source.id(), target.kind(), target.id());
    }
}

/// Returns the live targets of kind `of_kind` linked from `source`.
///
/// Targets that were dropped are pruned from the table and never returned.
pub fn get_links(source: &dyn Entity, of_kind: Kind) -> Vec<Handle> {
    let ids = with_mediator(|m| m.targets_of(source.id(), of_kind));
    let (live, dead): (Vec<_>, Vec<_>) =
        ids.into_iter().map(|id| (id, identity::resolve(id))).partition(|(_, e)| e.is_some());
    dead.into_iter().for_each(|(id, _)| forget(id));
    live.into_iter().filter_map(|(_, e)| e).collect()
}

/// Returns the live source of kind `of_kind` that `target` is linked from.
pub fn get_source(target: &dyn Entity, of_kind: Kind) -> Option<Handle> {
    let id = with_mediator(|m| m.sources.get(&(target.id(), of_kind)).copied())?;
    let source = identity::resolve(id);
    if source.is_none() {
        forget(id);
    }
    source
}

/// Removes every link naming `id`.
///
/// Called when an entity is dropped. Never panics: if the table is busy or
/// already torn down, the links are pruned lazily by later queries instead.
pub fn forget(id: Id) {
    let _ = MEDIATOR.try_with(|mediator| {
        if let Ok(mut mediator) = mediator.try_borrow_mut() {
            mediator.forget(id);
        }
    });
}

/// Returns the number of links currently recorded.
pub fn link_count() -> usize {
    with_mediator(|m| m.count())
}

// ----------------------------------------------------------------------------
// Cross-referencing
// ----------------------------------------------------------------------------

fn mismatch(entity: &dyn Entity, problem: &str) -> Error {
    Error::ObjectMismatch(format!("{} {} {problem}", entity.kind(), entity.id()))
}

/// Returns the members of `list` that can receive a taxon, descending one level
/// into nested containers (the nodes of each tree of a forest).
fn assignable_members(list: &Listable) -> Result<Vec<Handle>, Report> {
    let check = |entity: &Handle| match entity.accepts_taxon() && is_linkable(Kind::Taxon, entity.kind()) {
        true => Ok(entity.clone()),
        false => Err(mismatch(&**entity, "can neither hold nor receive taxa")),
    };

    let mut members = Vec::new();
    for entity in list.get_entities() {
        match (entity.accepts_taxon(), entity.listable()) {
            (true, _) => members.push(check(&entity)?),
            (false, Some(nested)) => {
                for inner in nested.get_entities() {
                    members.push(check(&inner)?);
                }
            }
            (false, None) => Err(mismatch(&*entity, "can neither hold nor receive taxa"))?,
        }
    }
    Ok(members)
}

/// Assigns to every member of `collection` the taxon of `taxa` with the same name.
///
/// - `collection` is a tree (its nodes), a forest (the nodes of its trees) or a
///   matrix (its rows). Members without a name are skipped.
/// - Fails with [`Error::ObjectMismatch`] if `taxa` is not a taxon set, or if any
///   member supports neither query. Every member is checked before any taxon is
///   assigned.
/// - Links `taxa` to `collection`, and to the forest holding it if `collection`
///   is a tree.
/// - Running it twice gives the same links as running it once.
///
/// Returns the number of members that were assigned a taxon.
pub fn cross_reference(collection: &dyn Entity, taxa: &dyn Entity) -> Result<usize, Report> {
    let taxa_list = match (taxa.kind(), taxa.listable()) {
        (Kind::TaxonSet, Some(list)) => list,
        _ => Err(mismatch(taxa, "cannot provide taxa"))?,
    };
    let collection_list = collection.listable().ok_or_else(|| mismatch(collection, "has no members"))?;
    if !is_linkable(Kind::TaxonSet, collection.kind()) {
        Err(mismatch(collection, "cannot reference a taxon set"))?
    }

    // first taxon with a given name wins
    let mut by_name: HashMap<String, Handle> = HashMap::new();
    for taxon in taxa_list.get_entities().into_iter().filter(|t| t.kind() == Kind::Taxon) {
        if let Some(name) = taxon.name() {
            by_name.entry(name).or_insert(taxon);
        }
    }

    let members = assignable_members(collection_list)
        .wrap_err_with(|| format!("Failed to cross-reference {} {}", collection.kind(), collection.id()))?;

    let mut assigned = 0;
    for member in &members {
        let Some(name) = member.name() else {
            continue;
        };
        match by_name.get(&name) {
            Some(taxon) => {
                link(&**taxon, &**member)?;
                assigned += 1;
            }
            None => warn!("No taxon named {name:?} in {} {}", taxa.kind(), taxa.id()),
        }
    }

    link(taxa, collection)?;
    if collection.kind() == Kind::Tree {
        if let Some(forest) = collection.container().filter(|c| c.kind() == Kind::Forest) {
            link(taxa, &*forest)?;
        }
    }
    debug!("Cross-referenced {assigned} of {} members of {} {}", members.len(), collection.kind(), collection.id());
    Ok(assigned)
}
