use log::debug;

use std::collections::HashMap;
use std::path::Path;

use survey_analytics::CellValue;

// Field contents that spreadsheet tools write for a missing value.
const NULL_MARKERS: [&str; 9] = ["", "#N/A", "N/A", "n/a", "NA", "NULL", "null", "NaN", "nan"];

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The name given to a column whose header cell is empty.
pub fn unnamed_column(idx: usize) -> String {
    format!("Unnamed: {}", idx)
}

/// Gives repeated header labels a `.N` suffix: `Q`, `Q` becomes `Q`, `Q.1`.
pub fn deduplicate_header(header: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut res: Vec<String> = Vec::with_capacity(header.len());
    for label in header.into_iter() {
        let mut name = label;
        let mut count = counts.get(&name).cloned().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            let renamed = format!("{}.{}", name, count);
            debug!("deduplicate_header: {:?} -> {:?}", name, renamed);
            name = renamed;
            count = counts.get(&name).cloned().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        res.push(name);
    }
    res
}

pub fn is_null_marker(field: &str) -> bool {
    NULL_MARKERS.contains(&field)
}

/// Reads a text field: missing-value markers become null, numbers become numbers.
pub fn text_to_cell(field: &str) -> CellValue {
    if is_null_marker(field) {
        return CellValue::Null;
    }
    match field.parse::<f64>() {
        Ok(f) if f.is_finite() => CellValue::Number(f),
        _ => CellValue::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_typed() {
        assert_eq!(text_to_cell(""), CellValue::Null);
        assert_eq!(text_to_cell("N/A"), CellValue::Null);
        assert_eq!(text_to_cell("19"), CellValue::Number(19.0));
        assert_eq!(text_to_cell("18-20"), CellValue::from("18-20"));
        assert_eq!(text_to_cell("inf"), CellValue::from("inf"));
        assert_eq!(text_to_cell("None"), CellValue::from("None"));
    }

    #[test]
    fn repeated_labels_are_renamed() {
        let header: Vec<String> = ["Q", "Q", "R", "Q", "Q.1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            deduplicate_header(header),
            vec!["Q", "Q.1", "R", "Q.2", "Q.1.1"]
        );
    }

    #[test]
    fn file_names_are_simplified() {
        assert_eq!(simplify_file_name("/data/2024/list.xlsx"), "list.xlsx");
        assert_eq!(simplify_file_name("list.csv"), "list.csv");
    }
}
