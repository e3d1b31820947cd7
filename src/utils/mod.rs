pub mod verbosity;

use biophylo_core::{downcast, mediator, Entity, Kind, Listable};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use std::path::Path;
use std::rc::Rc;

/// Returns the members of `list` that are a `T`, in order.
pub(crate) fn members<T: Entity>(list: &Listable) -> Vec<Rc<T>> {
    list.get_entities().iter().filter_map(downcast::<T>).collect()
}

/// Returns the live targets of `kind` linked from `source` that are a `T`.
pub(crate) fn linked<T: Entity>(source: &dyn Entity, kind: Kind) -> Vec<Rc<T>> {
    mediator::get_links(source, kind).iter().filter_map(downcast::<T>).collect()
}

/// Returns the live source of `kind` that `target` is linked from, if it is a `T`.
pub(crate) fn linked_source<T: Entity>(target: &dyn Entity, kind: Kind) -> Option<Rc<T>> {
    mediator::get_source(target, kind).as_ref().and_then(downcast::<T>)
}

/// Returns the table delimiter implied by a file extension (`.tsv`, `.txt`, `.csv`).
pub fn path_to_delim(path: &Path) -> Result<char, Report> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| eyre!("Failed to parse file extension from path: {path:?}"))?;
    match ext {
        "tsv" | "txt" => Ok('\t'),
        "csv" => Ok(','),
        _ => Err(eyre!("Unknown file extension {ext:?} in path: {path:?}"))?,
    }
}

/// Returns the Newick text of `input`, which is either a file path or the Newick string itself.
pub fn read_newick(input: &str) -> Result<String, Report> {
    let path = Path::new(input);
    match path.is_file() {
        true => std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read file: {path:?}")),
        false => Ok(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn delimiters() -> Result<(), Report> {
        assert_eq!(path_to_delim(Path::new("xref.tsv"))?, '\t');
        assert_eq!(path_to_delim(Path::new("xref.csv"))?, ',');
        assert!(path_to_delim(Path::new("xref.json")).is_err());
        assert!(path_to_delim(Path::new("xref")).is_err());
        Ok(())
    }

    #[test]
    fn newick_from_file_or_string() -> Result<(), Report> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "(A,B);")?;
        let path = file.path().to_string_lossy().to_string();
        assert_eq!(read_newick(&path)?.trim(), "(A,B);");
        assert_eq!(read_newick("(C,D);")?, "(C,D);");
        Ok(())
    }
}
