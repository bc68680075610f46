// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The delimiter used by the survey export to join the options of a multi-select question.
pub const MULTI_SELECT_DELIMITER: &str = ", ";

/// The content of one cell of the survey export.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    /// Free text or a categorical label.
    Text(String),
    /// A numeric cell, as read by the spreadsheet reader.
    Number(f64),
    /// An empty cell.
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The string form of the cell, or None for an empty cell.
    ///
    /// Whole numbers are printed without a fractional part, so that a cell
    /// holding `19.0` reads as `19`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", *f as i64))
            }
            CellValue::Number(f) => Some(f.to_string()),
            CellValue::Null => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }
}

impl From<Option<&str>> for CellValue {
    fn from(s: Option<&str>) -> CellValue {
        s.map(CellValue::from).unwrap_or(CellValue::Null)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> CellValue {
        CellValue::Number(f)
    }
}

/// A survey export: named columns of row-aligned cells.
///
/// Built once by a loader (see [crate::builder::DatasetBuilder]) and never
/// modified afterwards. Every column holds exactly `num_rows` cells.
#[derive(PartialEq, Debug, Clone)]
pub struct TabularDataset {
    pub(crate) columns: Vec<String>,
    // Column-major storage, aligned with `columns`.
    pub(crate) cells: Vec<Vec<CellValue>>,
    pub(crate) positions: HashMap<String, usize>,
    pub(crate) num_rows: usize,
}

impl TabularDataset {
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The column names, in the order of the export.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// The cells of a column. The name is matched literally.
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.positions
            .get(name)
            .map(|idx| self.cells[*idx].as_slice())
    }

    pub(crate) fn columns_iter(&self) -> impl Iterator<Item = (&String, &Vec<CellValue>)> {
        self.columns.iter().zip(self.cells.iter())
    }
}

// ******** Output data structures *********

/// Counts per category label.
///
/// The order is meaningful: either descending by count, or the ordering that
/// was requested for an ordinal scale.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FrequencyTable {
    pub entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }
}

/// Joint counts between two categorical columns.
///
/// `counts[i][j]` is the number of rows with `row_labels[i]` in the first column
/// and `column_labels[j]` in the second one. Labels are sorted.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CrossTab {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl CrossTab {
    pub fn get(&self, row_label: &str, column_label: &str) -> u64 {
        let row = self.row_labels.iter().position(|l| l == row_label);
        let col = self.column_labels.iter().position(|l| l == column_label);
        match (row, col) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// All the non-empty answers of a free-text question, joined with a space.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TextCorpus {
    pub text: String,
}

impl TextCorpus {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Equal-width bins over the numeric values of a column.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Percentage of empty cells per column, for the columns that have any,
/// highest first.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MissingnessReport {
    pub entries: Vec<(String, f64)>,
}

impl MissingnessReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, p)| *p)
    }
}

/// Errors that prevent a dataset from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DatasetErrors {
    EmptyHeader,
    DuplicateColumn(String),
    RowTooWide {
        row: usize,
        width: usize,
        expected: usize,
    },
}

impl Error for DatasetErrors {}

impl Display for DatasetErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetErrors::EmptyHeader => write!(f, "the header row has no columns"),
            DatasetErrors::DuplicateColumn(name) => {
                write!(f, "the column {:?} appears more than once in the header", name)
            }
            DatasetErrors::RowTooWide {
                row,
                width,
                expected,
            } => write!(
                f,
                "row {} has {} cells but the header only has {} columns",
                row, width, expected
            ),
        }
    }
}

// ********* Configuration **********

/// The default ordinal scale for the age question.
pub const DEFAULT_AGE_ORDER: [&str; 5] = ["Under 18", "18-20", "21-24", "25-29", "30 and above"];

pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

pub const DEFAULT_TOP_TERMS: usize = 30;

/// Parameters shared by all the analyses.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisOptions {
    pub multi_select_delimiter: String,
    /// The ordering used for ordinal distributions. Categories missing from the data are omitted.
    pub category_order: Vec<String>,
    pub histogram_bins: usize,
    pub top_terms: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            multi_select_delimiter: MULTI_SELECT_DELIMITER.to_string(),
            category_order: DEFAULT_AGE_ORDER.iter().map(|s| s.to_string()).collect(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            top_terms: DEFAULT_TOP_TERMS,
        }
    }
}
