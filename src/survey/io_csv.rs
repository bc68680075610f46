// Primitives for reading CSV files.

use log::debug;
use snafu::prelude::*;

use survey_analytics::builder::DatasetBuilder;

use crate::survey::{
    io_common::{deduplicate_header, text_to_cell, unnamed_column},
    *,
};

/// Reads a CSV export. The first record is the header.
pub fn read_csv_dataset(path: &str) -> SurveyResult<TabularDataset> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header_record = match records.next() {
        Some(r) => r.context(CsvLineParseSnafu { lineno: 1_usize })?,
        None => return EmptySheetSnafu { path }.fail(),
    };
    // Header labels are kept as-is, including leading invisible characters.
    let header: Vec<String> = header_record
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            if s.is_empty() {
                unnamed_column(idx)
            } else {
                s.to_string()
            }
        })
        .collect();
    let header = deduplicate_header(header);
    debug!("read_csv_dataset: header: {:?}", header);

    let mut builder = DatasetBuilder::new(&header).context(InvalidDatasetSnafu { path })?;
    for (idx, line_r) in records.enumerate() {
        // Line 1 is the header.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<CellValue> = line.iter().map(text_to_cell).collect();
        debug!("read_csv_dataset: lineno: {:?} row: {:?}", lineno, &cells);
        builder
            .add_row(cells)
            .context(InvalidDatasetSnafu { path })?;
    }
    Ok(builder.build())
}
