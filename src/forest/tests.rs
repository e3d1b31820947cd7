use crate::{Comparator, Entity, Error, Forest, FromNewick, Node, NumericField, Taxa, TaxaLinker, TaxonLinker, Tree};
use biophylo_core::identity;
use color_eyre::eyre::{Report, Result};

#[test]
fn topology() -> Result<(), Report> {
    let tree = Tree::from_newick("((A:1,B:2)AB:0.5,C:3)R;")?;
    let root = tree.get_root().unwrap();
    assert_eq!(root.name().as_deref(), Some("R"));
    assert!(root.is_root());

    let internals: Vec<_> = tree.get_internals().iter().filter_map(|n| n.name()).collect();
    assert_eq!(internals, ["R", "AB"]);
    let terminals: Vec<_> = tree.get_terminals().iter().filter_map(|n| n.name()).collect();
    assert_eq!(terminals, ["A", "B", "C"]);

    let descendants: Vec<_> = root.get_descendants().iter().filter_map(|n| n.name()).collect();
    assert_eq!(descendants, ["AB", "A", "B", "C"]);
    assert_eq!(tree.get_nodes()[2].get_tree().map(|t| t.id()), Some(tree.id()));
    Ok(())
}

#[test]
fn add_child_moves_and_rejects_cycles() -> Result<(), Report> {
    let (a, b, c) = (Node::with_name("A")?, Node::with_name("B")?, Node::with_name("C")?);
    a.add_child(&b)?;
    b.add_child(&c)?;

    let report = c.add_child(&a).unwrap_err();
    assert!(matches!(report.downcast_ref::<Error>(), Some(Error::BadArgument(_))));
    assert!(a.add_child(&a).is_err());

    // moving c under a detaches it from b
    a.add_child(&c)?;
    assert!(b.is_terminal());
    assert_eq!(a.get_children().len(), 2);
    assert_eq!(c.get_parent().map(|p| p.id()), Some(a.id()));

    a.remove_child(&c)?;
    assert!(c.is_root());
    assert!(a.remove_child(&c).is_err());
    Ok(())
}

#[test]
fn parents_are_not_owned() -> Result<(), Report> {
    let child = Node::with_name("A")?;
    let id = {
        let parent = Node::new();
        parent.add_child(&child)?;
        parent.id()
    };
    assert!(identity::resolve(id).is_none());
    assert!(child.is_root());
    Ok(())
}

#[test]
fn tree_length_and_query() -> Result<(), Report> {
    let tree = Tree::from_newick("((A:0,B:2)AB:0.5,C:3);")?;
    assert_eq!(tree.calc_tree_length(), 5.5);

    // zero is a length like any other; the root has none
    let short = tree.list().get_by_value(NumericField::BranchLength, Comparator::LessOrEqual, 0.5);
    let names: Vec<_> = short.iter().filter_map(|n| n.name()).collect();
    assert_eq!(names, ["AB", "A"]);
    Ok(())
}

#[test]
fn graph() -> Result<(), Report> {
    let tree = Tree::from_newick("((A:1,B:2)AB:0.5,C:3)R;")?;
    let graph = tree.to_graph();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 4);
    let total: f64 = graph.edge_weights().sum();
    assert_eq!(total, 6.5);

    let dot = tree.to_dot();
    assert!(dot.starts_with("digraph G {"));
    assert!(dot.contains("\"AB\""));
    Ok(())
}

#[test]
fn forest_taxa_link() -> Result<(), Report> {
    let forest = Forest::from_newick("(A,B);(A,C);")?;
    let taxa = Taxa::from_names(["A", "B", "C"])?;
    assert!(forest.get_taxa().is_none());

    forest.set_taxa(&taxa)?;
    assert_eq!(forest.get_taxa().map(|t| t.id()), Some(taxa.id()));
    forest.unset_taxa();
    assert!(forest.get_taxa().is_none());
    assert!(taxa.get_forests().is_empty());
    Ok(())
}

#[test]
fn forest_cross_reference() -> Result<(), Report> {
    let forest = Forest::from_newick("(A,B);(A,C);")?;
    let taxa = Taxa::from_names(["A", "B", "C"])?;

    assert_eq!(forest.cross_reference(&taxa)?, 4);
    assert_eq!(forest.get_taxa().map(|t| t.id()), Some(taxa.id()));

    let a = taxa.get_by_name("A").unwrap();
    assert_eq!(a.get_nodes().len(), 2);
    for node in forest.get_nodes().iter().filter(|n| n.is_terminal()) {
        assert_eq!(node.get_taxon().and_then(|t| t.name()), node.name());
    }

    // a single tree cross-referenced against new taxa also moves its forest
    let other = Taxa::from_names(["A", "B"])?;
    let trees = forest.get_trees();
    let first = &trees[0];
    assert_eq!(first.cross_reference(&other)?, 2);
    assert_eq!(first.get_taxa().map(|t| t.id()), Some(other.id()));
    assert_eq!(forest.get_taxa().map(|t| t.id()), Some(other.id()));
    assert_eq!(a.get_nodes().len(), 1);
    Ok(())
}

#[test]
fn dropped_forest_releases_nodes() -> Result<(), Report> {
    let taxa = Taxa::from_names(["A", "B"])?;
    {
        let forest = Forest::from_newick("(A,B);")?;
        forest.cross_reference(&taxa)?;
        assert_eq!(taxa.get_forests().len(), 1);
    }
    assert!(taxa.get_forests().is_empty());
    assert!(taxa.get_by_name("A").unwrap().get_nodes().is_empty());
    assert_eq!(taxa.get_taxa().len(), 2);
    Ok(())
}

#[test]
fn deep_subtrees_are_dropped() -> Result<(), Report> {
    let bottom = Node::with_name("A")?;
    let bottom_id = bottom.id();
    let mut top = bottom;
    for _ in 0..100_000 {
        let parent = Node::new();
        parent.add_child(&top)?;
        top = parent;
    }
    assert_eq!(top.get_descendants().len(), 100_000);
    drop(top);
    assert!(identity::resolve(bottom_id).is_none());
    Ok(())
}
