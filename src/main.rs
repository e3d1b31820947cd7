use biophylo::{cli::Command, run, Cli};
use clap::Parser;
use color_eyre::eyre::{Report, Result};

fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", args.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    // check which CLI command we're running (xref, query)
    let output = match args.command {
        Command::Xref(args) => run::render(&run::xref(&args)?, args.format)?,
        Command::Query(args) => run::render(&run::query(&args)?, args.format)?,
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
