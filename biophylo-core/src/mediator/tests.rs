use crate::fixtures::{datum, forest, ids, list, matrix, node, taxa, taxon, tree, Member};
use crate::mediator::{self, cross_reference, get_links, get_source, link, unlink};
use crate::{Entity, Error, Kind, Set};
use color_eyre::eyre::{Report, Result};
use std::rc::Rc;

fn error_of(report: &Report) -> Option<&Error> {
    report.downcast_ref::<Error>()
}

#[test]
fn link_is_idempotent() -> Result<(), Report> {
    let (t, f) = (taxa("T"), forest("F"));
    link(&*t, &*f)?;
    link(&*t, &*f)?;
    assert_eq!(ids(&get_links(&*t, Kind::Forest)), [f.id()]);
    assert!(get_links(&*t, Kind::Matrix).is_empty());
    assert_eq!(get_source(&*f, Kind::TaxonSet).map(|s| s.id()), Some(t.id()));
    Ok(())
}

#[test]
fn links_filter_by_kind() -> Result<(), Report> {
    let t = taxa("T");
    let (f1, f2, m) = (forest("F1"), forest("F2"), matrix("M"));
    link(&*t, &*f1)?;
    link(&*t, &*m)?;
    link(&*t, &*f2)?;
    assert_eq!(ids(&get_links(&*t, Kind::Forest)), [f1.id(), f2.id()]);
    assert_eq!(ids(&get_links(&*t, Kind::Matrix)), [m.id()]);
    Ok(())
}

#[test]
fn unlink_removes_only_that_pair() -> Result<(), Report> {
    let (t, f, m) = (taxa("T"), forest("F"), matrix("M"));
    link(&*t, &*f)?;
    link(&*t, &*m)?;
    unlink(&*t, &*f);
    // unlinking twice, or a pair never linked, is a no-op
    unlink(&*t, &*f);
    unlink(&*taxa("Other"), &*m);

    assert!(get_links(&*t, Kind::Forest).is_empty());
    assert_eq!(ids(&get_links(&*t, Kind::Matrix)), [m.id()]);
    assert!(get_source(&*f, Kind::TaxonSet).is_none());
    Ok(())
}

#[test]
fn relinking_moves_the_target() -> Result<(), Report> {
    let (t1, t2, m) = (taxa("T1"), taxa("T2"), matrix("M"));
    link(&*t1, &*m)?;
    link(&*t2, &*m)?;
    assert!(get_links(&*t1, Kind::Matrix).is_empty());
    assert_eq!(ids(&get_links(&*t2, Kind::Matrix)), [m.id()]);
    assert_eq!(get_source(&*m, Kind::TaxonSet).map(|s| s.id()), Some(t2.id()));
    Ok(())
}

#[test]
fn illegal_pairs_are_rejected() -> Result<(), Report> {
    let (t, n) = (taxa("T"), node("N"));
    let report = link(&*t, &*n).unwrap_err();
    assert!(matches!(error_of(&report), Some(Error::ObjectMismatch(_))));
    assert!(link(&*taxon("A"), &*forest("F")).is_err());
    assert!(link(&*Set::new("S")?, &*matrix("M")).is_err());
    Ok(())
}

#[test]
fn links_do_not_own_targets() -> Result<(), Report> {
    let t = taxa("T");
    let m = matrix("M");
    let kept = matrix("Kept");
    let before = mediator::link_count();
    link(&*t, &*m)?;
    link(&*t, &*kept)?;
    assert_eq!(mediator::link_count(), before + 2);

    let id = m.id();
    drop(m);
    assert!(crate::identity::resolve(id).is_none());
    assert_eq!(ids(&get_links(&*t, Kind::Matrix)), [kept.id()]);
    assert_eq!(mediator::link_count(), before + 1);

    // the taxon set is still fully usable
    list(&t).insert(taxon("A"))?;
    link(&*t, &*forest("F"))?;
    assert_eq!(list(&t).len(), 1);
    Ok(())
}

#[test]
fn links_do_not_own_sources() -> Result<(), Report> {
    let f = forest("F");
    let before = mediator::link_count();
    {
        let t = taxa("T");
        link(&*t, &*f)?;
    }
    assert!(get_source(&*f, Kind::TaxonSet).is_none());
    assert_eq!(mediator::link_count(), before);
    Ok(())
}

#[test]
fn forgetting_a_target_clears_both_directions() {
    let mut table = super::Mediator::default();
    let (set, tree_a, tree_b) = ((1, Kind::TaxonSet), (2, Kind::Tree), (3, Kind::Tree));
    let (tx, leaf) = ((4, Kind::Taxon), (5, Kind::Node));
    table.link(set, tree_a);
    table.link(set, tree_b);
    table.link(tx, leaf);
    assert_eq!(table.count(), 3);

    table.forget(2);
    assert_eq!(table.targets_of(1, Kind::Tree), [3]);
    table.forget(5);
    assert!(table.targets_of(4, Kind::Node).is_empty());
    assert_eq!(table.count(), 1);

    // unknown identifiers are ignored
    table.forget(42);
    assert_eq!(table.count(), 1);
}

#[test]
fn dropping_many_linked_targets() -> Result<(), Report> {
    let t = taxon("A");
    let before = mediator::link_count();
    let leaves: Vec<_> = (0..5000).map(|_| node("A")).collect();
    for leaf in &leaves {
        link(&*t, &**leaf)?;
    }
    assert_eq!(mediator::link_count(), before + 5000);
    drop(leaves);
    assert_eq!(mediator::link_count(), before);
    assert!(get_links(&*t, Kind::Node).is_empty());
    Ok(())
}

// ----------------------------------------------------------------------------
// Cross-referencing

fn taxon_set(names: &[&str]) -> Result<Rc<Member>, Report> {
    let t = taxa("T");
    for name in names {
        list(&t).insert(taxon(name))?;
    }
    Ok(t)
}

#[test]
fn cross_reference_tree() -> Result<(), Report> {
    let t = taxon_set(&["A", "B", "C"])?;
    let tr = tree("tree");
    let leaves = ["C", "A", "B"].map(node);
    for leaf in &leaves {
        list(&tr).insert(leaf.clone())?;
    }
    // an unmatched node is skipped
    list(&tr).insert(node("D"))?;

    assert_eq!(cross_reference(&*tr, &*t)?, 3);
    for leaf in &leaves {
        let assigned = get_source(&**leaf, Kind::Taxon).and_then(|taxon| taxon.name());
        assert_eq!(assigned, leaf.name());
    }
    assert_eq!(ids(&get_links(&*t, Kind::Tree)), [tr.id()]);

    // idempotent
    let links = mediator::link_count();
    assert_eq!(cross_reference(&*tr, &*t)?, 3);
    assert_eq!(mediator::link_count(), links);
    let a = list(&t).get_by_name("A").unwrap();
    assert_eq!(ids(&get_links(&*a, Kind::Node)), [leaves[1].id()]);
    Ok(())
}

#[test]
fn cross_reference_forest_links_forest() -> Result<(), Report> {
    let t = taxon_set(&["A", "B"])?;
    let f = forest("F");
    let (t1, t2) = (tree("t1"), tree("t2"));
    list(&t1).insert(node("A"))?;
    list(&t2).insert(node("A"))?;
    list(&t2).insert(node("B"))?;
    list(&f).insert(t1.clone())?;
    list(&f).insert(t2.clone())?;

    assert_eq!(cross_reference(&*f, &*t)?, 3);
    assert_eq!(ids(&get_links(&*t, Kind::Forest)), [f.id()]);
    let a = list(&t).get_by_name("A").unwrap();
    assert_eq!(get_links(&*a, Kind::Node).len(), 2);

    // a tree inside a forest also links the forest
    let other = taxon_set(&["A"])?;
    cross_reference(&*t1, &*other)?;
    assert_eq!(ids(&get_links(&*other, Kind::Forest)), [f.id()]);
    Ok(())
}

#[test]
fn cross_reference_matrix() -> Result<(), Report> {
    let t = taxon_set(&["A", "B"])?;
    let m = matrix("M");
    let rows = ["B", "A"].map(datum);
    for row in &rows {
        list(&m).insert(row.clone())?;
    }
    assert_eq!(cross_reference(&*m, &*t)?, 2);
    assert_eq!(ids(&get_links(&*t, Kind::Matrix)), [m.id()]);
    let b = list(&t).get_by_name("B").unwrap();
    assert_eq!(ids(&get_links(&*b, Kind::Datum)), [rows[0].id()]);
    Ok(())
}

#[test]
fn cross_reference_requires_a_taxon_set() -> Result<(), Report> {
    let tr = tree("tree");
    list(&tr).insert(node("A"))?;
    let report = cross_reference(&*tr, &*forest("F")).unwrap_err();
    assert!(matches!(error_of(&report), Some(Error::ObjectMismatch(_))));
    let report = cross_reference(&*tr, &*taxon("A")).unwrap_err();
    assert!(matches!(error_of(&report), Some(Error::ObjectMismatch(_))));
    Ok(())
}

#[test]
fn cross_reference_rejects_unassignable_members() -> Result<(), Report> {
    let t = taxon_set(&["A"])?;
    let report = cross_reference(&*t, &*t).unwrap_err();
    assert!(matches!(error_of(&report), Some(Error::ObjectMismatch(_))));
    let report = cross_reference(&*node("A"), &*t).unwrap_err();
    assert!(matches!(error_of(&report), Some(Error::ObjectMismatch(_))));
    Ok(())
}

#[test]
fn cross_reference_is_all_or_nothing() -> Result<(), Report> {
    let t = taxon_set(&["A"])?;
    let f = forest("F");
    let tr = tree("t1");
    let leaf = node("A");
    list(&tr).insert(leaf.clone())?;
    list(&f).insert(tr)?;
    // a forest member that neither holds nor receives taxa
    list(&f).insert(Member::build("odd", Kind::Set, Kind::Forest, None))?;

    let before = mediator::link_count();
    let report = cross_reference(&*f, &*t).unwrap_err();
    assert!(matches!(error_of(&report), Some(Error::ObjectMismatch(_))));
    assert_eq!(mediator::link_count(), before);
    assert!(get_source(&*leaf, Kind::Taxon).is_none());
    Ok(())
}
