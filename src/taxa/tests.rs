use crate::{Datum, Entity, Error, FromNewick, Matrix, Taxa, TaxaLinker, Taxon, TaxonLinker, Tree};
use color_eyre::eyre::{Report, Result};

#[test]
fn from_names_keeps_order() -> Result<(), Report> {
    let taxa = Taxa::from_names(["C", "A", "B"])?;
    let names: Vec<_> = taxa.get_taxa().iter().filter_map(|t| t.name()).collect();
    assert_eq!(names, ["C", "A", "B"]);
    assert_eq!(taxa.get_taxa()[0].get_taxa().map(|t| t.id()), Some(taxa.id()));
    Ok(())
}

#[test]
fn names_are_unique_and_valid() -> Result<(), Report> {
    let report = Taxa::from_names(["A", "A"]).unwrap_err();
    assert!(matches!(report.downcast_ref::<Error>(), Some(Error::Duplicate(_))));
    let report = Taxa::from_names(["A", "B:C"]).unwrap_err();
    assert!(matches!(report.downcast_ref::<Error>(), Some(Error::BadArgument(_))));

    // re-inserting the same taxon is not a duplicate name
    let taxa = Taxa::from_names(["A"])?;
    let a = taxa.get_by_name("A").unwrap();
    taxa.insert(&a)?;
    assert_eq!(taxa.get_taxa().len(), 2);
    Ok(())
}

#[test]
fn taxon_links() -> Result<(), Report> {
    let taxon = Taxon::new("A")?;
    let tree = Tree::from_newick("(A,B);")?;
    let node = tree.get_terminals()[0].clone();
    let row = Datum::new("A", "ACGT")?;

    node.set_taxon(&taxon)?;
    row.set_taxon(&taxon)?;
    assert_eq!(taxon.get_nodes().len(), 1);
    assert_eq!(taxon.get_data().len(), 1);

    node.unset_taxon();
    assert!(node.get_taxon().is_none());
    assert!(taxon.get_nodes().is_empty());

    drop(row);
    assert!(taxon.get_data().is_empty());
    Ok(())
}

#[test]
fn collections_of_a_taxon_set() -> Result<(), Report> {
    let taxa = Taxa::from_names(["A", "B"])?;
    let tree = Tree::from_newick("(A,B);")?;
    let matrix = Matrix::new();
    tree.set_taxa(&taxa)?;
    matrix.set_taxa(&taxa)?;

    assert_eq!(taxa.get_trees().len(), 1);
    assert_eq!(taxa.get_matrices().len(), 1);
    assert!(taxa.get_forests().is_empty());

    drop(matrix);
    assert!(taxa.get_matrices().is_empty());
    assert_eq!(taxa.get_taxa().len(), 2);
    Ok(())
}
