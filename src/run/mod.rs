//! The commands run by the `biophylo` binary.
//!
//! Each command reads a Newick forest and returns its result as a [`Table`].

pub mod query;
pub mod xref;

#[doc(inline)]
pub use query::query;
#[doc(inline)]
pub use xref::xref;

use crate::Table;
use clap::ValueEnum;
use color_eyre::eyre::{Report, Result, WrapErr};
use serde::{Deserialize, Serialize};

/// How a result [`Table`] is printed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
pub enum Format {
    /// A markdown table.
    #[default]
    Table,
    /// A JSON object with `headers` and `rows`.
    Json,
}

/// Returns `table` rendered in `format`.
///
/// ```rust
/// use biophylo::{run, run::Format, Table};
/// let mut table = Table::new();
/// table.headers = vec!["node".to_string()];
/// table.add_row(vec!["A".to_string()])?;
/// assert_eq!(run::render(&table, Format::Json)?, r#"{"headers":["node"],"rows":[["A"]]}"#);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn render(table: &Table<String>, format: Format) -> Result<String, Report> {
    match format {
        Format::Table => Ok(table.to_markdown()),
        Format::Json => serde_json::to_string(table).wrap_err("Failed to serialize table."),
    }
}
