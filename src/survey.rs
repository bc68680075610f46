use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_analytics::*;

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening the Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The worksheet {name:?} does not exist in {path}. Available worksheets: {available}"))]
    MissingWorksheet {
        name: String,
        path: String,
        available: String,
    },
    #[snafu(display("The file {path} has several worksheets ({available}), use --excel-worksheet-name to choose one"))]
    AmbiguousWorksheet { path: String, available: String },
    #[snafu(display("The file {path} has no header row"))]
    EmptySheet { path: String },
    #[snafu(display("Error opening the CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("The survey export {path} is not a valid table"))]
    InvalidDataset {
        source: DatasetErrors,
        path: String,
    },
    #[snafu(display("Error opening the JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Unknown section {name:?}. Known sections: demographics, readiness, correlation, word_clouds, missing_data"))]
    UnknownSection { name: String },
    #[snafu(display("Unknown topic {key:?} in the configuration"))]
    UnknownTopic { key: String },
    #[snafu(display("Cannot read input of type {input_type:?}: only xlsx and csv are supported"))]
    UnknownInputType { input_type: String },
    #[snafu(display("No survey export was provided: use --input or a configuration file with a dataSource"))]
    MissingInput {},
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the computed summary and the reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The groups of views offered to the user. Sections only exist in the front end:
/// each of them expands to a list of analyses.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Section {
    Demographics,
    Readiness,
    Correlation,
    WordClouds,
    MissingData,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Demographics,
        Section::Readiness,
        Section::Correlation,
        Section::WordClouds,
        Section::MissingData,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Demographics => "demographics",
            Section::Readiness => "readiness",
            Section::Correlation => "correlation",
            Section::WordClouds => "word_clouds",
            Section::MissingData => "missing_data",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Demographics => "Demographic Overview",
            Section::Readiness => "Sentiment & Readiness",
            Section::Correlation => "Preparedness vs Support Awareness",
            Section::WordClouds => "Word Cloud Insights",
            Section::MissingData => "Missing Data Report",
        }
    }

    pub fn from_key(key: &str) -> SurveyResult<Section> {
        let normalized = key.trim().to_lowercase().replace(['-', ' '], "_");
        Section::ALL
            .iter()
            .find(|s| s.key() == normalized)
            .cloned()
            .context(UnknownSectionSnafu { name: key })
    }

    /// The views of this section, in display order.
    pub fn views(&self, catalogue: &ColumnCatalogue) -> Vec<View> {
        match self {
            Section::Demographics => vec![
                View::new("gender", "Gender Distribution", Analysis::Distribution(Topic::Gender)),
                View::new(
                    "age_groups",
                    "Age Group Distribution",
                    Analysis::OrdinalDistribution(Topic::Age),
                ),
                View::new("age_histogram", "Age Distribution", Analysis::Histogram(Topic::Age)),
                View::new(
                    "languages",
                    "Languages Spoken at Home",
                    Analysis::MultiSelect(Topic::Languages),
                ),
            ],
            Section::Readiness => Topic::READINESS
                .iter()
                .map(|t| View {
                    name: t.key().to_string(),
                    // The question itself is the title.
                    title: catalogue.label(*t).unwrap_or_else(|| t.key()).to_string(),
                    analysis: Analysis::Distribution(*t),
                })
                .collect(),
            Section::Correlation => vec![
                View::new(
                    "preparedness_vs_warden",
                    "Preparedness vs. Awareness of Residence Warden Role",
                    Analysis::CrossTab(Topic::ReadinessIndependence, Topic::AwarenessWarden),
                ),
                View::new(
                    "preparedness_vs_support_services",
                    "Preparedness vs. Awareness of Student Support Services",
                    Analysis::CrossTab(
                        Topic::ReadinessIndependence,
                        Topic::AwarenessSupportServices,
                    ),
                ),
                View::new(
                    "preparedness_vs_student_affairs",
                    "Preparedness vs. Knowledge of Student Affairs Resources",
                    Analysis::CrossTab(
                        Topic::ReadinessIndependence,
                        Topic::AwarenessStudentAffairs,
                    ),
                ),
                View::new(
                    "preparedness_vs_collaboration",
                    "Preparedness vs. Awareness of Student Affairs and Warden Collaboration",
                    Analysis::CrossTab(Topic::ReadinessIndependence, Topic::AwarenessCollaboration),
                ),
            ],
            Section::WordClouds => vec![
                View::new("challenges", "Biggest Challenges", Analysis::Corpus(Topic::Challenges)),
                View::new(
                    "excitement",
                    "Most Exciting Aspects",
                    Analysis::Corpus(Topic::Excitement),
                ),
            ],
            Section::MissingData => vec![View::new(
                "missing_data",
                "Missing Data Percentage by Column",
                Analysis::Missingness,
            )],
        }
    }
}

/// One rendered unit of the report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct View {
    pub name: String,
    pub title: String,
    pub analysis: Analysis,
}

impl View {
    fn new(name: &str, title: &str, analysis: Analysis) -> View {
        View {
            name: name.to_string(),
            title: title.to_string(),
            analysis,
        }
    }
}

fn frequencies_to_json(ft: &FrequencyTable) -> JSValue {
    let counts: Vec<JSValue> = ft
        .entries
        .iter()
        .map(|(label, count)| json!({"label": label, "count": count}))
        .collect();
    json!({"total": ft.total(), "counts": counts})
}

fn result_to_json(res: &AnalysisResult) -> JSValue {
    match res {
        AnalysisResult::Frequencies(ft) => {
            let mut js = frequencies_to_json(ft);
            js["kind"] = json!("frequencies");
            js
        }
        AnalysisResult::Histogram(h) => {
            let bins: Vec<JSValue> = h
                .bins
                .iter()
                .map(|b| json!({"lower": b.lower, "upper": b.upper, "count": b.count}))
                .collect();
            json!({"kind": "histogram", "total": h.total(), "bins": bins})
        }
        AnalysisResult::CrossTab(ct) => json!({
            "kind": "crosstab",
            "total": ct.total(),
            "rowLabels": ct.row_labels,
            "columnLabels": ct.column_labels,
            "counts": ct.counts,
        }),
        AnalysisResult::Corpus { corpus, terms } => json!({
            "kind": "corpus",
            "corpus": corpus.as_str(),
            "terms": frequencies_to_json(terms)["counts"],
        }),
        AnalysisResult::Missingness(report) => {
            let columns: Vec<JSValue> = report
                .entries
                .iter()
                .map(|(c, p)| json!({"column": c, "percentMissing": p}))
                .collect();
            json!({"kind": "missingness", "columns": columns})
        }
    }
}

fn view_to_json(view: &View, outcome: &AnalysisOutcome) -> JSValue {
    match outcome {
        AnalysisOutcome::Skipped { missing } => {
            let keys: Vec<&str> = missing.iter().map(|t| t.key()).collect();
            json!({"view": view.name, "title": view.title, "status": "skipped", "missingTopics": keys})
        }
        AnalysisOutcome::InsufficientData => {
            json!({"view": view.name, "title": view.title, "status": "insufficientData"})
        }
        AnalysisOutcome::Ready(res) => json!({
            "view": view.name,
            "title": view.title,
            "status": "ready",
            "result": result_to_json(res),
        }),
    }
}

/// Computes all the views of one section.
pub fn run_section(
    dataset: &TabularDataset,
    catalogue: &ColumnCatalogue,
    options: &AnalysisOptions,
    section: Section,
) -> Vec<(View, AnalysisOutcome)> {
    section
        .views(catalogue)
        .into_iter()
        .map(|view| {
            let outcome = run_analysis(dataset, catalogue, &view.analysis, options);
            debug!("run_section: {:?} {:?}: {:?}", section, view.name, outcome);
            (view, outcome)
        })
        .collect()
}

fn build_summary_js(
    settings: &ReportSettings,
    dataset: &TabularDataset,
    check: &CatalogueCheck,
) -> JSValue {
    let missing_topics: Vec<&str> = check.missing.iter().map(|t| t.key()).collect();
    let results: Vec<JSValue> = settings
        .sections
        .iter()
        .map(|section| {
            let views: Vec<JSValue> =
                run_section(dataset, &settings.catalogue, &settings.options, *section)
                    .iter()
                    .map(|(view, outcome)| view_to_json(view, outcome))
                    .collect();
            json!({"section": section.key(), "title": section.title(), "views": views})
        })
        .collect();
    json!({
        "config": {
            "report": settings.report_name,
            "source": settings.source_name,
            "rows": dataset.num_rows(),
            "columns": dataset.num_columns(),
            "missingTopics": missing_topics,
        },
        "results": results
    })
}

/// Loads the survey export described by the settings.
pub fn load_dataset(settings: &ReportSettings) -> SurveyResult<TabularDataset> {
    info!(
        "Attempting to read survey export {:?} as {:?}",
        settings.input_path, settings.input_type
    );
    let dataset = match settings.input_type {
        InputType::Xlsx => {
            io_excel::read_excel_dataset(&settings.input_path, settings.worksheet.as_deref())
        }
        InputType::Csv => io_csv::read_csv_dataset(&settings.input_path),
    }?;
    info!(
        "Read {} rows and {} columns from {:?}",
        dataset.num_rows(),
        dataset.num_columns(),
        settings.input_path
    );
    Ok(dataset)
}

/// Runs the whole report and returns its JSON summary.
pub fn run_report(settings: &ReportSettings) -> SurveyResult<JSValue> {
    let dataset = load_dataset(settings)?;

    let check = settings.catalogue.check(&dataset);
    for topic in check.missing.iter() {
        warn!(
            "Question for topic {} not found in the export: {:?}",
            topic.key(),
            settings.catalogue.label(*topic).unwrap_or_default()
        );
    }

    Ok(build_summary_js(settings, &dataset, &check))
}

/// Compares a summary with a reference summary, printing the differences.
pub fn check_summary(summary: &JSValue, reference_path: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    if summary_ref != *summary {
        warn!("Found differences with the reference summary");
        let pretty_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        let pretty_summary = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
        print_diff(pretty_ref.as_str(), pretty_summary.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

pub fn run_report_cli(args: &Args) -> SurveyResult<()> {
    let settings = build_settings(args)?;
    info!("settings: {:?}", settings);

    let summary = run_report(&settings)?;
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;

    match settings.out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty);
        }
        Some(path) => {
            fs::write(path, pretty.as_bytes()).context(WritingOutputSnafu { path })?;
            info!("Summary written to {:?}", path);
        }
    }

    if let Some(reference_path) = settings.reference.as_deref() {
        check_summary(&summary, reference_path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    pub fn test_dir() -> String {
        format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"))
    }

    fn run_fixture_test(test_name: &str) {
        let _ = env_logger::builder().is_test(true).try_init();
        let args = Args {
            config: Some(format!(
                "{}/{}/{}_config.json",
                test_dir(),
                test_name,
                test_name
            )),
            reference: None,
            out: None,
            input: None,
            input_type: None,
            excel_worksheet_name: None,
            section: vec![],
            verbose: false,
        };
        let settings = build_settings(&args).unwrap();
        let summary = run_report(&settings).unwrap();
        let reference = format!(
            "{}/{}/{}_expected_summary.json",
            test_dir(),
            test_name,
            test_name
        );
        if let Err(e) = check_summary(&summary, &reference) {
            panic!("{}", e);
        }
    }

    #[test]
    fn residence_survey() {
        run_fixture_test("residence_survey");
    }

    #[test]
    fn sections_are_parsed_leniently() {
        assert_eq!(
            Section::from_key("Word-Clouds").unwrap(),
            Section::WordClouds
        );
        assert_eq!(
            Section::from_key("missing data").unwrap(),
            Section::MissingData
        );
        assert!(matches!(
            Section::from_key("charts"),
            Err(SurveyError::UnknownSection { .. })
        ));
    }

    #[test]
    fn single_section_is_computed_alone() {
        let args = Args {
            config: None,
            reference: None,
            out: None,
            input: Some(format!(
                "{}/residence_survey/residence_survey.csv",
                test_dir()
            )),
            input_type: None,
            excel_worksheet_name: None,
            section: vec!["correlation".to_string()],
            verbose: false,
        };
        let settings = build_settings(&args).unwrap();
        let summary = run_report(&settings).unwrap();
        let results = summary["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        let view = &results[0]["views"][0];
        assert_eq!(view["status"], json!("ready"));
        assert_eq!(view["result"]["total"], json!(3));
        assert_eq!(view["result"]["rowLabels"], json!(["Yes"]));
        assert_eq!(view["result"]["counts"], json!([[1, 2]]));
    }

    #[test]
    fn readiness_views_are_titled_by_question() {
        let views = Section::Readiness.views(&ColumnCatalogue::residence_survey());
        assert_eq!(views.len(), 7);
        assert_eq!(
            views[0].title,
            "How would you rate your confidence in adapting to a new environment?"
        );
        assert_eq!(views[0].name, "readiness.confidence");
    }

    #[test]
    fn every_topic_is_read_by_a_view() {
        let catalogue = ColumnCatalogue::residence_survey();
        let read: Vec<Topic> = Section::ALL
            .iter()
            .flat_map(|s| s.views(&catalogue))
            .flat_map(|v| v.analysis.topics())
            .collect();
        for topic in Topic::ALL.iter() {
            assert!(read.contains(topic), "{:?} is never analysed", topic);
        }
    }

    #[test]
    fn correlation_crosses_preparedness_with_each_awareness_question() {
        let views = Section::Correlation.views(&ColumnCatalogue::residence_survey());
        let awareness: Vec<Topic> = views
            .iter()
            .map(|v| match v.analysis {
                Analysis::CrossTab(Topic::ReadinessIndependence, t) => t,
                other => panic!("unexpected analysis {:?}", other),
            })
            .collect();
        assert_eq!(
            awareness,
            vec![
                Topic::AwarenessWarden,
                Topic::AwarenessSupportServices,
                Topic::AwarenessStudentAffairs,
                Topic::AwarenessCollaboration,
            ]
        );
    }

    #[test]
    fn missing_export_is_reported() {
        let args = Args {
            config: None,
            reference: None,
            out: None,
            input: Some(format!("{}/does_not_exist.xlsx", test_dir())),
            input_type: None,
            excel_worksheet_name: None,
            section: vec![],
            verbose: false,
        };
        let settings = build_settings(&args).unwrap();
        assert!(matches!(
            run_report(&settings),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }
}
