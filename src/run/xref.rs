use crate::run::Format;
use crate::{utils, Entity, Forest, FromNewick, Table, Taxa, TaxaLinker, TaxonLinker};
use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cross-reference the nodes of a Newick forest with a set of taxa.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct Args {
    /// A Newick string, or the path of a Newick file.
    #[clap(short = 'n', long)]
    pub newick: String,

    /// Taxon names, comma separated. Defaults to the names of the terminal nodes.
    #[clap(short = 't', long, value_delimiter = ',')]
    pub taxa: Vec<String>,

    /// Output format.
    #[clap(short = 'f', long, value_enum, default_value_t = Format::default())]
    pub format: Format,

    /// Also write the table to a TSV or CSV file.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Builds a forest and a taxon set, cross-references them, and returns one row
/// per node with its tree (1-based), name and assigned taxon.
///
/// ```rust
/// use biophylo::run::{xref, xref::Args};
/// let args = Args { newick: "(A,B)R;".to_string(), taxa: vec!["A".to_string()], ..Default::default() };
/// let table = xref(&args)?;
/// assert_eq!(table.rows, [["1", "R", ""], ["1", "A", "A"], ["1", "B", ""]]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn xref(args: &Args) -> Result<Table<String>, Report> {
    let newick = utils::read_newick(&args.newick)?;
    let forest = Forest::from_newick(&newick)?;

    let taxa = match args.taxa.is_empty() {
        true => {
            let nodes = forest.get_nodes();
            Taxa::from_names(nodes.iter().filter(|n| n.is_terminal()).filter_map(|n| n.name()).unique())?
        }
        false => Taxa::from_names(args.taxa.iter().map(|t| t.trim()))?,
    };

    let assigned = forest.cross_reference(&taxa).wrap_err("Failed to cross-reference forest and taxa.")?;
    info!("Assigned {assigned} of {} nodes to {} taxa.", forest.get_nodes().len(), taxa.list().len());

    let mut table = Table::new();
    table.headers = ["tree", "node", "taxon"].map(String::from).to_vec();
    for (i, tree) in forest.get_trees().iter().enumerate() {
        for node in tree.get_nodes() {
            let taxon = node.get_taxon().and_then(|t| t.name()).unwrap_or_default();
            table.add_row(vec![(i + 1).to_string(), node.name().unwrap_or_default(), taxon])?;
        }
    }

    if let Some(path) = &args.output {
        table.write(path, None)?;
        info!("Wrote cross-references to: {path:?}");
    }
    Ok(table)
}
