//! CSV dataset loading.
//!
//! Loads the files behind `DataSource` keywords into Polars DataFrames.
//! Paths were already resolved against their defining document during
//! template resolution, so they are used as-is here.

use std::collections::BTreeMap;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use tlf_filter::FilterExpr;
use tlf_model::DataSource;

use crate::error::{DataError, Result};
use crate::eval::apply_filter;

/// Reads one data source into a DataFrame.
pub fn load_data_source(source: &DataSource) -> Result<DataFrame> {
    let path = &source.path;
    std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DataError::FileNotFound { path: path.clone() }
        } else {
            DataError::FileRead {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.clone()))
        .map_err(|e| DataError::CsvParse {
            path: path.clone(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| DataError::CsvParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        name = %source.name,
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded dataset"
    );
    Ok(df)
}

/// Loaded datasets keyed by data-source name.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    frames: BTreeMap<String, DataFrame>,
}

impl DatasetStore {
    /// Loads every data source into memory.
    pub fn load(sources: &[DataSource]) -> Result<Self> {
        let mut frames = BTreeMap::new();
        for source in sources {
            frames.insert(source.name.clone(), load_data_source(source)?);
        }
        Ok(Self { frames })
    }

    pub fn get(&self, name: &str) -> Result<&DataFrame> {
        self.frames.get(name).ok_or_else(|| DataError::DatasetNotLoaded {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    /// Applies a filter to the named dataset and returns the row subset.
    pub fn select(&self, dataset: &str, filter: &FilterExpr) -> Result<DataFrame> {
        apply_filter(self.get(dataset)?, filter, dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").expect("temp file");
        write!(file, "{content}").expect("write");
        file
    }

    fn source(name: &str, path: PathBuf) -> DataSource {
        DataSource {
            name: name.to_string(),
            path,
        }
    }

    #[test]
    fn loads_csv_with_header() {
        let file = temp_csv("USUBJID,SAFFL\nS001,Y\nS002,N\n");
        let df = load_data_source(&source("adsl", file.path().to_path_buf())).expect("load");
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = load_data_source(&source("adsl", PathBuf::from("/nonexistent/adsl.csv")))
            .expect_err("should fail");
        assert!(matches!(err, DataError::FileNotFound { .. }));
    }

    #[test]
    fn store_selects_filtered_rows() {
        let file = temp_csv("USUBJID,SAFFL\nS001,Y\nS002,N\nS003,Y\n");
        let store =
            DatasetStore::load(&[source("adsl", file.path().to_path_buf())]).expect("load");

        let filter = tlf_filter::parse("adsl:saffl == 'Y'").expect("parse");
        let subset = store.select("adsl", &filter).expect("select");
        assert_eq!(subset.height(), 2);

        let err = store.select("adae", &filter).expect_err("unknown dataset");
        assert!(matches!(err, DataError::DatasetNotLoaded { .. }));
    }
}
