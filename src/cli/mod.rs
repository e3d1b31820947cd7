//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::run::{query, xref};
use crate::Verbosity;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = biophylo::Cli::parse();
/// ```
/// Here is a manual example of setting the command-line input:
/// ```rust
/// use biophylo::{cli::Command, Cli};
/// use clap::Parser;
/// let input = ["biophylo", "xref", "--newick", "(A,B);", "--taxa", "A,B", "--format", "json"];
/// let args = Cli::parse_from(input);
/// match args.command {
///     Command::Xref(args) => assert_eq!(args.taxa, ["A", "B"]),
///     Command::Query(_) => unreachable!(),
/// }
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "biophylo", author, version)]
#[clap(about = "biophylo cross-references phylogenetic trees and character data through shared taxa.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to [xref](crate::run::xref()).
    #[clap(about = "Assign the taxa to the nodes of a Newick forest by name.")]
    Xref(xref::Args),

    /// Pass CLI arguments to [query](crate::run::query()).
    #[clap(about = "Select the nodes of a Newick forest by branch length or score.")]
    Query(query::Args),
}
