use crate::run::Format;
use crate::{utils, Comparator, Entity, Forest, FromNewick, NumericField, Table};
use clap::Parser;
use color_eyre::eyre::{Report, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// Select the nodes of a Newick forest by a numeric field.
#[derive(Clone, Debug, Deserialize, Parser, Serialize)]
pub struct Args {
    /// A Newick string, or the path of a Newick file.
    #[clap(short = 'n', long)]
    pub newick: String,

    /// Numeric field to compare (score, branch-length).
    #[clap(long, default_value = "branch-length")]
    pub field: NumericField,

    /// Comparison operator (<, <=, ==, >=, >).
    #[clap(short = 'c', long, default_value = ">=")]
    pub comparator: Comparator,

    /// Value to compare against.
    #[clap(short = 't', long, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Output format.
    #[clap(short = 'f', long, value_enum, default_value_t = Format::default())]
    pub format: Format,
}

/// Returns one row per node, tree by tree, whose `field` compares true against
/// the threshold. Nodes without the field are never selected.
///
/// ```rust
/// use biophylo::run::{query, query::Args, Format};
/// use biophylo::{Comparator, NumericField};
/// let args = Args {
///     newick: "(A:0,B:2)R;".to_string(),
///     field: NumericField::BranchLength,
///     comparator: Comparator::Less,
///     threshold: 1.0,
///     format: Format::Table,
/// };
/// assert_eq!(query(&args)?.rows, [["1", "A", "0"]]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn query(args: &Args) -> Result<Table<String>, Report> {
    let newick = utils::read_newick(&args.newick)?;
    let forest = Forest::from_newick(&newick)?;

    let mut table = Table::new();
    table.headers = ["tree", "node", args.field.to_string().as_str()].map(String::from).to_vec();
    for (i, tree) in forest.get_trees().iter().enumerate() {
        for node in tree.list().get_by_value(args.field, args.comparator, args.threshold) {
            let value = node.numeric(args.field).map(|v| v.to_string()).unwrap_or_default();
            table.add_row(vec![(i + 1).to_string(), node.name().unwrap_or_default(), value])?;
        }
    }
    info!("Found {} nodes with {} {} {}.", table.rows.len(), args.field, args.comparator, args.threshold);
    Ok(table)
}
