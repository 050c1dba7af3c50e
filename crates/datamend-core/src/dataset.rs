use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};

/// An in-memory CSV table: raw string cells under an ordered header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name (file stem).
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Case-insensitive lookup of a header position.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    /// Iterate the raw values of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    pub fn cell_count(&self) -> u64 {
        self.rows.len() as u64 * self.headers.len() as u64
    }
}

/// List the CSV files of a dataset directory, sorted by file name.
pub fn list_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidDataset(format!(
            "dataset directory not found: {}",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "csv") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read a headered CSV file into memory.
///
/// Rows shorter than the header are padded with empty cells; extra cells are
/// dropped. Both cases log a warning with the offending row number.
pub fn read_table(path: &Path) -> Result<Table> {
    let name = table_name(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        if row.len() != headers.len() {
            warn!(
                table = %name,
                row = row_idx + 1,
                cells = row.len(),
                expected = headers.len(),
                "ragged row normalized"
            );
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Ok(Table {
        name,
        headers,
        rows,
    })
}

/// Write a table as CSV, returning the number of bytes written.
pub fn write_table(path: &Path, table: &Table) -> Result<u64> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer.flush()?;
    let counting = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    Ok(counting.bytes_written())
}

fn table_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| Error::InvalidDataset(format!("not a table file: {}", path.display())))
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
