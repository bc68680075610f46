pub use crate::config::*;

use std::collections::HashMap;

/// A builder for assembling a survey dataset row by row.
///
/// This is the entry point for loaders: they feed the header row, then every
/// response row, and get an immutable [TabularDataset] back.
///
/// ```
/// pub use survey_analytics::builder::DatasetBuilder;
/// pub use survey_analytics::CellValue;
/// # use survey_analytics::DatasetErrors;
///
/// let mut builder = DatasetBuilder::new(&["What is your gender?".to_string()])?;
///
/// builder.add_row(vec![CellValue::from("Female")])?;
/// builder.add_row(vec![CellValue::Null])?;
///
/// let dataset = builder.build();
/// assert_eq!(dataset.num_rows(), 2);
///
/// # Ok::<(), DatasetErrors>(())
/// ```
pub struct DatasetBuilder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<CellValue>>,
}

impl DatasetBuilder {
    pub fn new(header: &[String]) -> Result<DatasetBuilder, DatasetErrors> {
        if header.is_empty() {
            return Err(DatasetErrors::EmptyHeader);
        }
        let mut seen: HashMap<&String, usize> = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            if seen.insert(name, idx).is_some() {
                return Err(DatasetErrors::DuplicateColumn(name.clone()));
            }
        }
        Ok(DatasetBuilder {
            _columns: header.to_vec(),
            _rows: Vec::new(),
        })
    }

    /// Adds a response row.
    ///
    /// Short rows are padded with empty cells. A row may be wider than the header
    /// only if the extra cells are all empty.
    pub fn add_row(&mut self, cells: Vec<CellValue>) -> Result<(), DatasetErrors> {
        let expected = self._columns.len();
        let mut row = cells;
        if row.len() > expected {
            if row[expected..].iter().any(|c| !c.is_null()) {
                return Err(DatasetErrors::RowTooWide {
                    row: self._rows.len() + 1,
                    width: row.len(),
                    expected,
                });
            }
            row.truncate(expected);
        }
        row.resize(expected, CellValue::Null);
        self._rows.push(row);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> TabularDataset {
        let num_rows = self._rows.len();
        let mut cells: Vec<Vec<CellValue>> = self
            ._columns
            .iter()
            .map(|_| Vec::with_capacity(num_rows))
            .collect();
        for row in self._rows {
            for (idx, cell) in row.into_iter().enumerate() {
                cells[idx].push(cell);
            }
        }
        let positions: HashMap<String, usize> = self
            ._columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        TabularDataset {
            columns: self._columns,
            cells,
            positions,
            num_rows,
        }
    }
}
