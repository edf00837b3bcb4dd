//! In-memory CSV table shared by every pipeline stage
//!
//! Cells are kept as the raw strings read from disk. Typing happens in the
//! stage that needs it (validation parses numbers and timestamps, the
//! transformer derives features), so a table can always be written back
//! byte-for-byte equivalent to what was ingested.

use crate::error::{CoreError, CoreResult};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Cell tokens treated as missing values
const NULL_TOKENS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Whether a raw cell value represents a missing value
pub fn is_null(value: &str) -> bool {
    NULL_TOKENS.contains(&value.trim())
}

/// Parse a raw cell as a number
///
/// Null tokens and `NaN` yield `None`; surrounding whitespace is ignored.
pub fn parse_number(value: &str) -> Option<f64> {
    if is_null(value) {
        return None;
    }
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// An ordered table of string cells with a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, normalizing its width to the header
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether the table has a column
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column that must be present
    pub fn require_column(&self, name: &str) -> CoreResult<usize> {
        self.column_index(name)
            .ok_or_else(|| CoreError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// All values of a required column, in row order
    pub fn column(&self, name: &str) -> CoreResult<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Set a column's values, appending the column if it does not exist
    ///
    /// `values` must hold one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Copy the rows at `indices`, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Split rows into (kept, dropped) by a per-row mask
    pub fn partition(&self, mask: &[bool]) -> (Table, Table) {
        debug_assert_eq!(mask.len(), self.rows.len());
        let mut kept = Table::new(self.headers.clone());
        let mut dropped = Table::new(self.headers.clone());
        for (row, &keep) in self.rows.iter().zip(mask) {
            if keep {
                kept.rows.push(row.clone());
            } else {
                dropped.rows.push(row.clone());
            }
        }
        (kept, dropped)
    }

    /// Keep only the listed columns that exist, in the listed order
    pub fn project(&self, columns: &[&str]) -> Table {
        let picked: Vec<(usize, &str)> = columns
            .iter()
            .filter_map(|c| self.column_index(c).map(|i| (i, *c)))
            .collect();
        Table {
            headers: picked.iter().map(|(_, c)| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picked.iter().map(|(i, _)| row[*i].clone()).collect())
                .collect(),
        }
    }

    /// Re-shape rows to another header order
    ///
    /// Columns missing from this table become empty cells; columns not in
    /// `headers` are dropped.
    pub fn aligned_to(&self, headers: &[String]) -> Table {
        let mapping: Vec<Option<usize>> = headers.iter().map(|h| self.column_index(h)).collect();
        Table {
            headers: headers.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    mapping
                        .iter()
                        .map(|m| m.map(|i| row[i].clone()).unwrap_or_default())
                        .collect()
                })
                .collect(),
        }
    }

    /// Parse CSV text with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Table, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut table = Table::new(headers);
        for record in rdr.records() {
            let record = record?;
            table.push_row(record.iter().map(|v| v.to_string()).collect());
        }
        Ok(table)
    }

    /// Read a CSV file with a header row
    pub fn read_csv(path: &Path) -> CoreResult<Table> {
        let file = fs::File::open(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_reader(file).map_err(|e| CoreError::csv(path, e))
    }

    /// Write the table to a CSV file, replacing any existing file
    pub fn write_csv(&self, path: &Path) -> CoreResult<()> {
        ensure_parent(path)?;
        if self.headers.is_empty() {
            return fs::write(path, "").map_err(|e| CoreError::io(path, e));
        }

        let mut wtr = csv::Writer::from_path(path).map_err(|e| CoreError::csv(path, e))?;
        wtr.write_record(&self.headers)
            .map_err(|e| CoreError::csv(path, e))?;
        for row in &self.rows {
            wtr.write_record(row).map_err(|e| CoreError::csv(path, e))?;
        }
        wtr.flush().map_err(|e| CoreError::io(path, e))?;
        Ok(())
    }

    /// Append rows to a CSV file
    ///
    /// When the file is missing or empty it is created with this table's
    /// header. Otherwise rows are aligned to the existing header and written
    /// without repeating it. Returns the number of rows appended.
    pub fn append_csv(&self, path: &Path) -> CoreResult<usize> {
        let existing = read_header(path)?;
        let Some(header) = existing else {
            self.write_csv(path)?;
            return Ok(self.len());
        };

        let extra: Vec<&String> = self
            .headers
            .iter()
            .filter(|h| !header.contains(h))
            .collect();
        if !extra.is_empty() {
            log::warn!(
                "Dropping columns not present in {}: {:?}",
                path.display(),
                extra
            );
        }

        let aligned = self.aligned_to(&header);
        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| CoreError::io(path, e))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for row in &aligned.rows {
            wtr.write_record(row).map_err(|e| CoreError::csv(path, e))?;
        }
        wtr.flush().map_err(|e| CoreError::io(path, e))?;
        Ok(aligned.len())
    }
}

/// Read only the header of a CSV file
///
/// Returns `None` when the file does not exist or has no header line.
pub fn read_header(path: &Path) -> CoreResult<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CoreError::csv(path, e))?;
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| CoreError::csv(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        Ok(None)
    } else {
        Ok(Some(headers))
    }
}

/// Count data lines in a text file (all lines minus the header)
///
/// Used as a fallback row count when a file cannot be parsed as CSV.
pub fn count_data_lines(path: &Path) -> CoreResult<usize> {
    let file = fs::File::open(path).map_err(|e| CoreError::io(path, e))?;
    let mut lines = 0usize;
    for line in BufReader::new(file).lines() {
        line.map_err(|e| CoreError::io(path, e))?;
        lines += 1;
    }
    Ok(lines.saturating_sub(1))
}

/// Create the parent directory of `path` if needed
pub fn ensure_parent(path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
