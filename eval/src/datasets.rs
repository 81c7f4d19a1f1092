// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Loading of the pre-mapped QC and MLCQ code smell datasets

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Code smell categories covered by the mapped datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Smell {
    #[serde(rename = "Data_Class")]
    DataClass,
    #[serde(rename = "Feature_Envy")]
    FeatureEnvy,
    #[serde(rename = "God_Class")]
    GodClass,
    #[serde(rename = "Long_Method")]
    LongMethod,
}

impl Smell {
    pub const ALL: [Smell; 4] = [
        Smell::DataClass,
        Smell::FeatureEnvy,
        Smell::GodClass,
        Smell::LongMethod,
    ];

    /// Key used for this smell in dataset and model dictionaries
    pub fn name(&self) -> &'static str {
        match self {
            Smell::DataClass => "Data_Class",
            Smell::FeatureEnvy => "Feature_Envy",
            Smell::GodClass => "God_Class",
            Smell::LongMethod => "Long_Method",
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            Smell::DataClass => "data_class",
            Smell::FeatureEnvy => "feature_envy",
            Smell::GodClass => "god_class",
            Smell::LongMethod => "long_method",
        }
    }
}

impl fmt::Display for Smell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source dataset of labeled smells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetFamily {
    Qc,
    Mlcq,
}

impl DatasetFamily {
    /// Case-insensitive selector parsing ("qc", "QC", "Mlcq", ...)
    pub fn parse(selector: &str) -> Option<Self> {
        match selector.trim().to_uppercase().as_str() {
            "QC" => Some(DatasetFamily::Qc),
            "MLCQ" => Some(DatasetFamily::Mlcq),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatasetFamily::Qc => "QC",
            DatasetFamily::Mlcq => "MLCQ",
        }
    }

    /// Fixed CSV file name holding `smell` for this family
    pub fn file_name(&self, smell: Smell) -> String {
        match self {
            DatasetFamily::Qc => format!("mapped_{}.csv", smell.file_stem()),
            DatasetFamily::Mlcq => format!("mapped_mlcq_{}.csv", smell.file_stem()),
        }
    }
}

impl FromStr for DatasetFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            anyhow::anyhow!("Unknown dataset '{}', expected 'QC' or 'MLCQ'", s)
        })
    }
}

impl fmt::Display for DatasetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A loaded CSV table: header row plus string records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MappedTable {
    /// Read a headed CSV file.
    ///
    /// Empty files and rows whose field count differs from the header (short or long) are errors.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open mapped dataset: {}", path.display()))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.is_empty() {
            bail!("Mapped dataset has no columns: {}", path.display());
        }

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result
                .with_context(|| format!("Failed to read record {} in {}", idx, path.display()))?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    /// Values of a named column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Occurrence count of each distinct value in a column
    pub fn value_counts(&self, name: &str) -> Option<HashMap<String, usize>> {
        let values = self.column(name)?;
        let mut counts = HashMap::new();
        for value in values {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        Some(counts)
    }
}

/// All four smell tables of one dataset family
#[derive(Debug, Clone)]
pub struct MappedDatasets {
    pub family: DatasetFamily,
    pub tables: BTreeMap<Smell, MappedTable>,
}

impl MappedDatasets {
    pub fn get(&self, smell: Smell) -> Option<&MappedTable> {
        self.tables.get(&smell)
    }

    /// Look up a table by its dictionary key, e.g. "God_Class"
    pub fn by_name(&self, name: &str) -> Option<&MappedTable> {
        Smell::ALL
            .iter()
            .find(|s| s.name() == name)
            .and_then(|s| self.tables.get(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Smell, &MappedTable)> {
        self.tables.iter()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(MappedTable::len).sum()
    }
}

/// Load all four mapped tables of `family` from `dir`
pub fn load_mapped(dir: &Path, family: DatasetFamily) -> Result<MappedDatasets> {
    let mut tables = BTreeMap::new();
    for smell in Smell::ALL {
        let path = dir.join(family.file_name(smell));
        let table = MappedTable::from_path(&path)
            .with_context(|| format!("Failed to load {} {} dataset", family, smell))?;
        tracing::debug!("{} {}: {} rows, {} columns", family, smell, table.len(), table.num_columns());
        tables.insert(smell, table);
    }
    Ok(MappedDatasets { family, tables })
}

/// Read the mapped datasets selected by `selector` ("QC" or "MLCQ", any case).
///
/// Errors are logged and turned into `None`.
pub fn read_mapped_dataset(dir: &Path, selector: &str) -> Option<MappedDatasets> {
    tracing::info!("Loading Mapped {} dataset . . .", selector);

    let Some(family) = DatasetFamily::parse(selector) else {
        tracing::error!(
            "Can't find dataset '{}', please use 'QC' or 'MLCQ' as the data selector",
            selector
        );
        return None;
    };

    match load_mapped(dir, family) {
        Ok(datasets) => {
            tracing::info!("Done, all mapped {} datasets are loaded!", family);
            Some(datasets)
        }
        Err(e) => {
            tracing::error!("Exception while reading Mapped {} dataset: {:#}", family, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_family(dir: &Path, family: DatasetFamily) {
        for smell in Smell::ALL {
            let body = format!("name,loc,is_smell\n{}_a,10,1\n{}_b,20,0\n{}_c,30,0\n", smell, smell, smell);
            std::fs::write(dir.join(family.file_name(smell)), body).unwrap();
        }
    }

    #[test]
    fn test_selector_case_insensitive() {
        assert_eq!(DatasetFamily::parse("qc"), Some(DatasetFamily::Qc));
        assert_eq!(DatasetFamily::parse("QC"), Some(DatasetFamily::Qc));
        assert_eq!(DatasetFamily::parse("mLcQ"), Some(DatasetFamily::Mlcq));
        assert_eq!(DatasetFamily::parse("XYZ"), None);
        assert!("XYZ".parse::<DatasetFamily>().is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(DatasetFamily::Qc.file_name(Smell::GodClass), "mapped_god_class.csv");
        assert_eq!(
            DatasetFamily::Mlcq.file_name(Smell::FeatureEnvy),
            "mapped_mlcq_feature_envy.csv"
        );
    }

    #[test]
    fn test_read_qc_and_lowercase_identical() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), DatasetFamily::Qc);

        let upper = read_mapped_dataset(dir.path(), "QC").expect("QC should load");
        let lower = read_mapped_dataset(dir.path(), "qc").expect("qc should load");

        assert_eq!(upper.family, lower.family);
        assert_eq!(upper.tables, lower.tables);
        assert_eq!(upper.tables.len(), 4);
        let keys: Vec<&str> = upper.iter().map(|(s, _)| s.name()).collect();
        assert_eq!(keys, vec!["Data_Class", "Feature_Envy", "God_Class", "Long_Method"]);
    }

    #[test]
    fn test_read_mlcq() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), DatasetFamily::Mlcq);

        let datasets = read_mapped_dataset(dir.path(), "MLCQ").expect("MLCQ should load");
        assert_eq!(datasets.family, DatasetFamily::Mlcq);
        assert_eq!(datasets.total_rows(), 12);

        let god_class = datasets.by_name("God_Class").unwrap();
        assert_eq!(god_class.headers, vec!["name", "loc", "is_smell"]);
        assert_eq!(god_class.column("loc").unwrap(), vec!["10", "20", "30"]);
    }

    #[test]
    fn test_unknown_selector_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), DatasetFamily::Qc);
        assert!(read_mapped_dataset(dir.path(), "XYZ").is_none());
    }

    #[test]
    fn test_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), DatasetFamily::Qc);
        std::fs::remove_file(dir.path().join("mapped_long_method.csv")).unwrap();

        assert!(read_mapped_dataset(dir.path(), "QC").is_none());
        let err = load_mapped(dir.path(), DatasetFamily::Qc).unwrap_err();
        assert!(format!("{:#}", err).contains("Long_Method"));
    }

    #[test]
    fn test_malformed_csv_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), DatasetFamily::Qc);
        std::fs::write(dir.path().join("mapped_data_class.csv"), "a,b\n1,2,3\n").unwrap();

        assert!(read_mapped_dataset(dir.path(), "qc").is_none());
    }

    #[test]
    fn test_empty_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), DatasetFamily::Qc);
        let path = dir.path().join("mapped_god_class.csv");
        std::fs::write(&path, "").unwrap();

        assert!(MappedTable::from_path(&path).is_err());
        assert!(read_mapped_dataset(dir.path(), "QC").is_none());
    }

    #[test]
    fn test_short_row_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.csv");
        std::fs::write(&path, "a,b,c\n1,2\n").unwrap();

        assert!(MappedTable::from_path(&path).is_err());
    }

    #[test]
    fn test_value_counts() {
        let table = MappedTable {
            headers: vec!["is_smell".to_string()],
            rows: vec![vec!["1".to_string()], vec!["0".to_string()], vec!["0".to_string()]],
        };

        let counts = table.value_counts("is_smell").unwrap();
        assert_eq!(counts.get("0"), Some(&2));
        assert_eq!(counts.get("1"), Some(&1));
        assert!(table.value_counts("missing").is_none());
    }
}
