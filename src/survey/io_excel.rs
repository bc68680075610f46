use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use survey_analytics::builder::DatasetBuilder;

use crate::survey::{
    io_common::{deduplicate_header, is_null_marker, unnamed_column},
    *,
};

// The worksheet name of a default Excel export.
const DEFAULT_WORKSHEET: &str = "Sheet1";

/// Reads an Excel export. The first row of the worksheet is the header.
pub fn read_excel_dataset(path: &str, worksheet: Option<&str>) -> SurveyResult<TabularDataset> {
    let wrange = get_range(path, worksheet)?;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptySheetSnafu { path })?;
    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, dt)| header_name(idx, dt))
        .collect();
    let header = deduplicate_header(header);
    debug!("read_excel_dataset: header: {:?}", header);

    let mut builder = DatasetBuilder::new(&header).context(InvalidDatasetSnafu { path })?;
    for (idx, row) in iter.enumerate() {
        let cells: Vec<CellValue> = row.iter().map(read_cell).collect();
        debug!("read_excel_dataset: idx: {:?} row: {:?}", idx, &cells);
        builder
            .add_row(cells)
            .context(InvalidDatasetSnafu { path })?;
    }
    Ok(builder.build())
}

fn header_name(idx: usize, cell: &DataType) -> String {
    match cell {
        // Labels are kept as-is, including leading invisible characters.
        DataType::String(s) if !s.is_empty() => s.clone(),
        DataType::Empty | DataType::String(_) => unnamed_column(idx),
        other => other.to_string(),
    }
}

fn read_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) if is_null_marker(s) => CellValue::Null,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Text(if *b { "True" } else { "False" }.to_string()),
        // Dates are kept as spreadsheet serial numbers.
        DataType::DateTime(f) => CellValue::Number(*f),
        // Formula errors such as #N/A are missing values.
        DataType::Error(_) => CellValue::Null,
        DataType::Empty => CellValue::Null,
        #[allow(unreachable_patterns)]
        other => CellValue::Text(other.to_string()),
    }
}

/// The worksheet to read: the requested one, else `Sheet1`, else the only one.
fn choose_worksheet(
    path: &str,
    sheet_names: &[String],
    worksheet: Option<&str>,
) -> SurveyResult<String> {
    match worksheet {
        // A worksheet name was provided, use it.
        Some(n) => Ok(n.to_string()),
        None if sheet_names.iter().any(|n| n == DEFAULT_WORKSHEET) => {
            Ok(DEFAULT_WORKSHEET.to_string())
        }
        None => match sheet_names {
            [] => EmptySheetSnafu { path }.fail(),
            [single] => Ok(single.clone()),
            _ => AmbiguousWorksheetSnafu {
                path,
                available: sheet_names.join(", "),
            }
            .fail(),
        },
    }
}

fn get_range(path: &str, worksheet: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let name = choose_worksheet(path, &sheet_names, worksheet)?;
    debug!("get_range: path: {:?} using worksheet: {:?}", path, name);

    workbook
        .worksheet_range(&name)
        .context(MissingWorksheetSnafu {
            name: name.as_str(),
            path,
            available: sheet_names.join(", "),
        })?
        .context(OpeningExcelSnafu { path })
}
