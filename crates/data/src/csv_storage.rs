use csv::Writer;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::DataError;

/// A keyed result table: one header row, then one row per key.
///
/// The first header cell names the key column (empty for square matrices).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Returns the row whose first cell equals `key`.
    #[must_use]
    pub fn row(&self, key: &str) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|r| r.first().is_some_and(|k| k == key))
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Destination for named result tables.
pub trait TableSink {
    /// Persists `table` under `name`, replacing anything stored under that name.
    ///
    /// Returns the location written, for progress output.
    ///
    /// # Errors
    /// Returns error if the table cannot be stored.
    fn write_table(&mut self, name: &str, table: &Table) -> Result<PathBuf, DataError>;
}

/// Writes tables as CSV files into one output directory.
pub struct CsvStorage {
    dir: PathBuf,
}

impl CsvStorage {
    /// Opens the output directory, creating it if absent.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a table to `path`, truncating any existing file.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_csv(path: &Path, table: &Table) -> Result<(), DataError> {
        let file = File::create(path)?;
        let mut writer = Writer::from_writer(file);

        writer.write_record(&table.header)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl TableSink for CsvStorage {
    fn write_table(&mut self, name: &str, table: &Table) -> Result<PathBuf, DataError> {
        let path = self.dir.join(name);
        Self::write_csv(&path, table)?;
        debug!(path = %path.display(), rows = table.rows.len(), "Wrote table");
        Ok(path)
    }
}

/// Keeps tables in memory, keyed by name.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub tables: BTreeMap<String, Table>,
}

impl TableSink for InMemorySink {
    fn write_table(&mut self, name: &str, table: &Table) -> Result<PathBuf, DataError> {
        self.tables.insert(name.to_string(), table.clone());
        Ok(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(["classification", "total_trades", "win_rate"]);
        table.push_row(["Fear", "3", "0.6666666666666666"]);
        table.push_row(["Greed", "0", "0"]);
        table
    }

    #[test]
    fn table_row_lookup_by_key() {
        let table = sample_table();

        assert_eq!(table.row("Greed").unwrap()[1], "0");
        assert!(table.row("Neutral").is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn csv_storage_creates_directory_and_writes() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("nested").join("output");
        let mut storage = CsvStorage::new(&out).unwrap();

        let path = storage.write_table("perf.csv", &sample_table()).unwrap();

        assert_eq!(path, out.join("perf.csv"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "classification,total_trades,win_rate\nFear,3,0.6666666666666666\nGreed,0,0\n"
        );
    }

    #[test]
    fn csv_storage_overwrites_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let mut storage = CsvStorage::new(root.path()).unwrap();
        storage.write_table("t.csv", &sample_table()).unwrap();

        let mut small = Table::new(["k", "v"]);
        small.push_row(["a", "1"]);
        let path = storage.write_table("t.csv", &small).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "k,v\na,1\n");
    }

    #[test]
    fn in_memory_sink_replaces_by_name() {
        let mut sink = InMemorySink::default();
        sink.write_table("a.csv", &sample_table()).unwrap();
        sink.write_table("a.csv", &Table::new(["only"])).unwrap();

        assert_eq!(sink.tables.len(), 1);
        assert!(sink.tables["a.csv"].is_empty());
    }
}
