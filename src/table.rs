//! Create and print the [Table] reported by the command-line interface.

use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row-based table of generic data.
///
/// # Examples
///
/// ```
/// use biophylo::Table;
///
/// let mut table = Table::new();
/// table.headers = vec!["1", "2", "3"];
/// table.add_row(vec!["A", "B", "C"])?;
///
/// assert_eq!(table.to_markdown(), "\
/// | 1 | 2 | 3 |
/// |---|---|---|
/// | A | B | C |
/// ");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table<T> {
    /// Names of the table columns.
    pub headers: Vec<T>,
    /// Rows of table values.
    pub rows: Vec<Vec<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create a new table with empty headers and rows.
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new() }
    }

    /// Add a new row to the table.
    ///
    /// Fails if the row is not as long as the headers.
    pub fn add_row(&mut self, row: Vec<T>) -> Result<(), Report> {
        let (new, ex) = (row.len(), self.headers.len());
        if new != ex {
            Err(eyre!("New row size ({new}) does not match the table headers ({ex})."))?
        }
        self.rows.push(row);
        Ok(())
    }
}

impl<T> Table<T>
where
    T: Display + PartialEq<str>,
{
    /// Returns the values of the column named `header`.
    ///
    /// ```
    /// use biophylo::Table;
    /// let mut table = Table::new();
    /// table.headers = vec!["node".to_string(), "taxon".to_string()];
    /// table.add_row(vec!["A".to_string(), "A".to_string()])?;
    /// assert_eq!(table.get_column("taxon")?, [&"A".to_string()]);
    /// assert!(table.get_column("tree").is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn get_column(&self, header: &str) -> Result<Vec<&T>, Report> {
        let i = self
            .headers
            .iter()
            .position(|h| *h == *header)
            .ok_or_else(|| eyre!("Column '{header}' was not found in table."))?;
        Ok(self.rows.iter().map(|row| &row[i]).collect())
    }
}

impl<T> Table<T>
where
    T: Display,
{
    /// Write table to file.
    ///
    /// If not provided, the delimiter is identified from the path suffix (`.tsv` or `.csv`).
    pub fn write(&self, path: &Path, delim: Option<char>) -> Result<(), Report> {
        let mut file = File::create(path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;

        // if not provided, lookup delimiter from file extension
        let delim = match delim {
            Some(c) => c,
            None => utils::path_to_delim(path)?,
        };

        // write headers
        let line = format!("{}\n", self.headers.iter().join(delim.to_string().as_str()));
        file.write_all(line.as_bytes())
            .wrap_err_with(|| format!("Unable to write table headers: {line}"))?;

        // write regular rows
        for row in &self.rows {
            let line = format!("{}\n", row.iter().join(delim.to_string().as_str()));
            file.write_all(line.as_bytes())
                .wrap_err_with(|| format!("Unable to write table rows: {line}"))?;
        }

        Ok(())
    }

    /// Convert table to markdown format.
    pub fn to_markdown(&self) -> String {
        // get the maximum width of each column, +2 to add space on either side
        let col_widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(col_i, header)| {
                let header_width = header.to_string().len();
                self.rows
                    .iter()
                    .map(|row| row[col_i].to_string().len().max(header_width) + 2)
                    .max()
                    .unwrap_or(header_width + 2)
            })
            .collect_vec();

        let mut markdown = String::from("|");
        // frame in between headers and rows
        let mut header_frame = String::from("|");

        // Create the header line
        for (header, col_width) in self.headers.iter().zip(col_widths.iter()) {
            let cell = format!("{:^width$}|", header.to_string(), width = col_width);
            markdown.push_str(&cell);

            let frame = format!("{}|", "-".repeat(*col_width));
            header_frame.push_str(&frame);
        }
        markdown.push('\n');
        markdown.push_str(&header_frame);
        markdown.push('\n');

        // Create the row lines
        for row in &self.rows {
            markdown.push('|');
            for (col_i, col_width) in col_widths.iter().enumerate() {
                let cell = format!("{:^width$}|", row[col_i].to_string(), width = col_width);
                markdown.push_str(&cell);
            }
            markdown.push('\n');
        }

        markdown
    }
}
