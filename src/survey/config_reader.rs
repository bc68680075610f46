use log::{debug, info};
use snafu::prelude::*;

use crate::survey::io_common::simplify_file_name;
use crate::survey::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSource")]
    pub data_source: Option<DataSource>,
    /// Overrides of the question labels, by topic key.
    #[serde(default)]
    pub topics: BTreeMap<String, String>,
    #[serde(rename = "ageOrder")]
    pub age_order: Option<Vec<String>>,
    #[serde(rename = "multiSelectDelimiter")]
    pub multi_select_delimiter: Option<String>,
    #[serde(rename = "histogramBins")]
    pub histogram_bins: Option<usize>,
    #[serde(rename = "topTerms")]
    pub top_terms: Option<usize>,
    #[serde(default)]
    pub sections: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

impl InputType {
    pub fn from_name(name: &str) -> SurveyResult<InputType> {
        match name.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "excel" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            _ => UnknownInputTypeSnafu { input_type: name }.fail(),
        }
    }

    pub fn from_path(path: &str) -> SurveyResult<InputType> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        InputType::from_name(extension)
    }
}

/// Everything needed to run a report, once the command line and the configuration file are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub report_name: String,
    pub source_name: String,
    pub input_path: String,
    pub input_type: InputType,
    pub worksheet: Option<String>,
    pub sections: Vec<Section>,
    pub catalogue: ColumnCatalogue,
    pub options: AnalysisOptions,
    pub out: Option<String>,
    pub reference: Option<String>,
}

pub fn read_report_config(path: &str) -> SurveyResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_report_config: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// The residence survey catalogue, with the labels overridden by the configuration.
pub fn build_catalogue(topics: &BTreeMap<String, String>) -> SurveyResult<ColumnCatalogue> {
    let mut catalogue = ColumnCatalogue::residence_survey();
    for (key, label) in topics.iter() {
        let topic = Topic::from_key(key).context(UnknownTopicSnafu { key })?;
        debug!("build_catalogue: {} -> {:?}", key, label);
        catalogue = catalogue.with_label(topic, label);
    }
    Ok(catalogue)
}

pub fn build_options(config: &ReportConfig) -> SurveyResult<AnalysisOptions> {
    let mut options = AnalysisOptions::default();
    if let Some(order) = config.age_order.clone() {
        options.category_order = order;
    }
    if let Some(delim) = config.multi_select_delimiter.clone() {
        if delim.is_empty() {
            whatever!("multiSelectDelimiter may not be empty");
        }
        options.multi_select_delimiter = delim;
    }
    if let Some(bins) = config.histogram_bins {
        if bins == 0 {
            whatever!("histogramBins must be at least 1");
        }
        options.histogram_bins = bins;
    }
    if let Some(n) = config.top_terms {
        options.top_terms = n;
    }
    Ok(options)
}

fn parse_sections(names: &[String]) -> SurveyResult<Vec<Section>> {
    if names.is_empty() {
        return Ok(Section::ALL.to_vec());
    }
    let mut res: Vec<Section> = Vec::new();
    for name in names.iter() {
        let section = Section::from_key(name)?;
        if !res.contains(&section) {
            res.push(section);
        }
    }
    Ok(res)
}

/// Merges the command line with the configuration file, if any.
/// The command line takes precedence.
pub fn build_settings(args: &Args) -> SurveyResult<ReportSettings> {
    let (config, config_dir): (ReportConfig, Option<PathBuf>) = match args.config.as_deref() {
        Some(path) => {
            let config = read_report_config(path)?;
            info!("config: {:?}", config);
            let dir = Path::new(path).parent().map(|p| p.to_path_buf());
            (config, dir)
        }
        None => (ReportConfig::default(), None),
    };

    let input_path: String = match (args.input.clone(), config.data_source.as_ref()) {
        (Some(p), _) => p,
        (None, Some(ds)) => {
            // Paths in the configuration are relative to the configuration file.
            let p: PathBuf = match config_dir.as_ref() {
                Some(dir) => dir.join(&ds.file_path),
                None => PathBuf::from(&ds.file_path),
            };
            p.as_path().display().to_string()
        }
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let provider = config.data_source.as_ref().and_then(|ds| ds.provider.clone());
    let input_type = match (args.input_type.as_deref(), provider.as_deref()) {
        (Some(t), _) => InputType::from_name(t)?,
        (None, Some(t)) if args.input.is_none() => InputType::from_name(t)?,
        _ => InputType::from_path(&input_path)?,
    };

    let worksheet = args.excel_worksheet_name.clone().or_else(|| {
        config
            .data_source
            .as_ref()
            .and_then(|ds| ds.excel_worksheet_name.clone())
    });

    let sections = if args.section.is_empty() {
        parse_sections(&config.sections)?
    } else {
        parse_sections(&args.section)?
    };

    let source_name = simplify_file_name(&input_path);
    let report_name = config
        .output_settings
        .report_name
        .clone()
        .unwrap_or_else(|| source_name.clone());

    let out = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_path.clone());

    Ok(ReportSettings {
        report_name,
        source_name,
        input_path,
        input_type,
        worksheet,
        sections,
        catalogue: build_catalogue(&config.topics)?,
        options: build_options(&config)?,
        out,
        reference: args.reference.clone(),
    })
}
