mod config;
pub mod builder;
pub mod catalogue;
pub mod manual;

use log::{debug, info};

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap, HashSet},
};

pub use crate::catalogue::{CatalogueCheck, ColumnCatalogue, Topic};
pub use crate::config::*;

// **** Analyses ****

/// One view of the survey. Each variant maps to exactly one aggregate.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Analysis {
    /// Counts of a single-answer question, most frequent first.
    Distribution(Topic),
    /// Counts of a single-answer question, following the configured category order.
    OrdinalDistribution(Topic),
    /// Equal-width histogram of the numeric answers of a question.
    Histogram(Topic),
    /// Counts of the individual options of a multi-select question.
    MultiSelect(Topic),
    /// Joint counts of two questions.
    CrossTab(Topic, Topic),
    /// The corpus of a free-text question and its most frequent terms.
    Corpus(Topic),
    /// The share of empty cells per column.
    Missingness,
}

impl Analysis {
    /// The topics this analysis reads.
    pub fn topics(&self) -> Vec<Topic> {
        match self {
            Analysis::Distribution(t)
            | Analysis::OrdinalDistribution(t)
            | Analysis::Histogram(t)
            | Analysis::MultiSelect(t)
            | Analysis::Corpus(t) => vec![*t],
            Analysis::CrossTab(a, b) => vec![*a, *b],
            Analysis::Missingness => vec![],
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum AnalysisResult {
    Frequencies(FrequencyTable),
    Histogram(Histogram),
    CrossTab(CrossTab),
    Corpus {
        corpus: TextCorpus,
        terms: FrequencyTable,
    },
    Missingness(MissingnessReport),
}

/// What running an analysis produced.
///
/// None of the outcomes is an error: a question missing from the export or
/// a question nobody answered are expected irregularities of survey data.
#[derive(PartialEq, Debug, Clone)]
pub enum AnalysisOutcome {
    /// Some topics are not in the dataset.
    Skipped { missing: Vec<Topic> },
    /// The columns exist but no row qualifies.
    InsufficientData,
    Ready(AnalysisResult),
}

/// Runs one analysis against a dataset.
///
/// Arguments:
/// * `dataset` the survey export
/// * `catalogue` the mapping from topics to the columns of the export
/// * `analysis` the view to compute
/// * `options` parameters shared by the analyses
pub fn run_analysis(
    dataset: &TabularDataset,
    catalogue: &ColumnCatalogue,
    analysis: &Analysis,
    options: &AnalysisOptions,
) -> AnalysisOutcome {
    let topics = analysis.topics();
    let mut columns: Vec<&str> = Vec::new();
    let mut missing: Vec<Topic> = Vec::new();
    for t in topics.iter() {
        match catalogue.resolve(dataset, *t) {
            Some(c) => columns.push(c),
            None => missing.push(*t),
        }
    }
    if !missing.is_empty() {
        info!(
            "run_analysis: skipping {:?}, missing topics {:?}",
            analysis, missing
        );
        return AnalysisOutcome::Skipped { missing };
    }
    // The columns were resolved against this dataset.
    let cells = |idx: usize| dataset.column(columns[idx]).unwrap_or(&[]);

    let res = match analysis {
        Analysis::Distribution(_) => AnalysisResult::Frequencies(distribution(cells(0), None)),
        Analysis::OrdinalDistribution(_) => AnalysisResult::Frequencies(distribution(
            cells(0),
            Some(options.category_order.as_slice()),
        )),
        Analysis::Histogram(_) => {
            AnalysisResult::Histogram(numeric_histogram(cells(0), options.histogram_bins))
        }
        Analysis::MultiSelect(_) => AnalysisResult::Frequencies(explode_multi_select(
            cells(0),
            options.multi_select_delimiter.as_str(),
        )),
        Analysis::CrossTab(_, _) => AnalysisResult::CrossTab(cross_tabulate(cells(0), cells(1))),
        Analysis::Corpus(_) => {
            let corpus = text_corpus(cells(0));
            // Term aggregation needs a non-empty corpus.
            if corpus.is_empty() {
                return AnalysisOutcome::InsufficientData;
            }
            let terms = top_terms(&corpus, options.top_terms);
            // A word cloud needs at least one term.
            if terms.is_empty() {
                debug!("run_analysis: {:?}: no term left in {:?}", analysis, corpus);
                return AnalysisOutcome::InsufficientData;
            }
            AnalysisResult::Corpus { corpus, terms }
        }
        Analysis::Missingness => AnalysisResult::Missingness(missingness(dataset)),
    };

    let insufficient = match &res {
        AnalysisResult::Frequencies(ft) => ft.is_empty(),
        AnalysisResult::Histogram(h) => h.is_empty(),
        AnalysisResult::CrossTab(ct) => ct.is_empty(),
        AnalysisResult::Corpus { .. } => false,
        // An empty report means that nothing is missing.
        AnalysisResult::Missingness(_) => false,
    };
    debug!("run_analysis: {:?} -> {:?}", analysis, res);
    if insufficient {
        AnalysisOutcome::InsufficientData
    } else {
        AnalysisOutcome::Ready(res)
    }
}

// **** Aggregates ****

/// Counts labels, most frequent first. Ties keep the order of first appearance.
fn count_by_frequency<I: Iterator<Item = String>>(labels: I) -> Vec<(String, u64)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();
    for label in labels {
        if let Some(idx) = positions.get(&label) {
            counts[*idx].1 += 1;
        } else {
            positions.insert(label.clone(), counts.len());
            counts.push((label, 1));
        }
    }
    // Stable sort: ties stay in order of appearance.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Splits every answer of a multi-select question on `delimiter` and counts the options.
///
/// Empty cells are dropped. Options are not trimmed.
pub fn explode_multi_select(cells: &[CellValue], delimiter: &str) -> FrequencyTable {
    let tokens = cells.iter().filter_map(|c| c.as_text()).flat_map(|s| {
        s.split(delimiter)
            .map(|tok| tok.to_string())
            .collect::<Vec<String>>()
    });
    FrequencyTable {
        entries: count_by_frequency(tokens),
    }
}

/// Counts the answers of a single-answer question.
///
/// With an `order`, only the categories of the order that occur in the data are
/// returned, in that order. Answers outside of the order are not reported.
pub fn distribution(cells: &[CellValue], order: Option<&[String]>) -> FrequencyTable {
    let counts = count_by_frequency(cells.iter().filter_map(|c| c.as_text()));
    let entries = match order {
        None => counts,
        Some(order) => {
            let by_label: HashMap<String, u64> = counts.into_iter().collect();
            let mut emitted: HashSet<&String> = HashSet::new();
            let mut res: Vec<(String, u64)> = Vec::new();
            for label in order.iter() {
                if let Some(c) = by_label.get(label) {
                    if emitted.insert(label) {
                        res.push((label.clone(), *c));
                    }
                }
            }
            let dropped = by_label.len() - res.len();
            if dropped > 0 {
                debug!(
                    "distribution: {} categories outside of the order {:?}",
                    dropped, order
                );
            }
            res
        }
    };
    FrequencyTable { entries }
}

/// Joint counts of two columns of the same dataset.
///
/// Rows where either cell is empty are dropped.
pub fn cross_tabulate(first: &[CellValue], second: &[CellValue]) -> CrossTab {
    let pairs: Vec<(String, String)> = first
        .iter()
        .zip(second.iter())
        .filter_map(|(a, b)| match (a.as_text(), b.as_text()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    let row_labels: Vec<String> = pairs
        .iter()
        .map(|(a, _)| a.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let column_labels: Vec<String> = pairs
        .iter()
        .map(|(_, b)| b.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let row_idx: HashMap<&String, usize> =
        row_labels.iter().enumerate().map(|(i, l)| (l, i)).collect();
    let col_idx: HashMap<&String, usize> = column_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l, i))
        .collect();

    let mut counts: Vec<Vec<u64>> = vec![vec![0; column_labels.len()]; row_labels.len()];
    for (a, b) in pairs.iter() {
        counts[row_idx[a]][col_idx[b]] += 1;
    }
    debug!(
        "cross_tabulate: {} qualifying rows out of {}",
        pairs.len(),
        first.len()
    );
    CrossTab {
        row_labels,
        column_labels,
        counts,
    }
}

/// Joins the non-empty answers of a free-text question with a single space, in row order.
pub fn text_corpus(cells: &[CellValue]) -> TextCorpus {
    let parts: Vec<String> = cells.iter().filter_map(|c| c.as_text()).collect();
    TextCorpus {
        text: parts.join(" "),
    }
}

/// The percentage of empty cells of each column that has any, highest first.
///
/// Columns with the same percentage keep the order of the export.
pub fn missingness(dataset: &TabularDataset) -> MissingnessReport {
    let total = dataset.num_rows();
    if total == 0 {
        return MissingnessReport::default();
    }
    let mut entries: Vec<(String, f64)> = dataset
        .columns_iter()
        .filter_map(|(name, cells)| {
            let nulls = cells.iter().filter(|c| c.is_null()).count();
            if nulls > 0 {
                Some((name.clone(), (100 * nulls) as f64 / total as f64))
            } else {
                None
            }
        })
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    MissingnessReport { entries }
}

/// Reads the cells as numbers. Text that does not parse as a number becomes None.
pub fn coerce_numeric(cells: &[CellValue]) -> Vec<Option<f64>> {
    cells
        .iter()
        .map(|c| match c {
            CellValue::Number(f) if f.is_finite() => Some(*f),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        })
        .collect()
}

/// Histogram of the numeric answers with `num_bins` equal-width bins between
/// the smallest and the largest value. The last bin includes its upper edge.
pub fn numeric_histogram(cells: &[CellValue], num_bins: usize) -> Histogram {
    let values: Vec<f64> = coerce_numeric(cells).into_iter().flatten().collect();
    let num_bins = num_bins.max(1);
    let (min, max) = match (
        values.iter().cloned().reduce(f64::min),
        values.iter().cloned().reduce(f64::max),
    ) {
        (Some(min), Some(max)) => (min, max),
        _ => return Histogram::default(),
    };
    let (lower, upper) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (upper - lower) / num_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            lower: lower + width * i as f64,
            upper: if i + 1 == num_bins {
                upper
            } else {
                lower + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for v in values.iter() {
        let mut idx = (((v - lower) / width) as usize).min(num_bins - 1);
        // Rounding may put the value next to its bin: the edges decide.
        if idx > 0 && *v < bins[idx].lower {
            idx -= 1;
        } else if idx + 1 < num_bins && *v >= bins[idx].upper {
            idx += 1;
        }
        bins[idx].count += 1;
    }
    Histogram { bins }
}

// Common English words that carry no theme on their own.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "will", "with", "would", "you", "your",
];

/// The words of a text, lowercased, without stop words, numbers and single letters.
pub fn terms(text: &str) -> Vec<String> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().cloned().collect();
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '’'))
        .map(|w| {
            w.strip_suffix("'s")
                .or_else(|| w.strip_suffix("’s"))
                .unwrap_or(w)
        })
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !w.chars().all(|c| c.is_numeric()))
        .filter(|w| !stop_words.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// The `n` most frequent terms of a corpus.
pub fn top_terms(corpus: &TextCorpus, n: usize) -> FrequencyTable {
    let mut entries = count_by_frequency(terms(corpus.as_str()).into_iter());
    entries.truncate(n);
    FrequencyTable { entries }
}

#[cfg(test)]
mod tests {
    use super::builder::DatasetBuilder;
    use super::*;

    fn cells(values: &[Option<&str>]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    fn dataset(columns: &[(&str, Vec<CellValue>)]) -> TabularDataset {
        let header: Vec<String> = columns.iter().map(|(n, _)| n.to_string()).collect();
        let num_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut builder = DatasetBuilder::new(&header).unwrap();
        for r in 0..num_rows {
            builder
                .add_row(columns.iter().map(|(_, c)| c[r].clone()).collect())
                .unwrap();
        }
        builder.build()
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn gender_distribution_drops_nulls() {
        init();
        let ft = distribution(&cells(&[Some("Male"), Some("Female"), None]), None);
        assert_eq!(ft.total(), 2);
        assert_eq!(ft.get("Male"), Some(1));
        assert_eq!(ft.get("Female"), Some(1));
        assert_eq!(ft.entries.len(), 2);
    }

    #[test]
    fn distribution_is_descending_by_count() {
        let ft = distribution(
            &cells(&[Some("Agree"), Some("Neutral"), Some("Neutral"), Some("Agree"), Some("Neutral")]),
            None,
        );
        assert_eq!(
            ft.entries,
            vec![("Neutral".to_string(), 3), ("Agree".to_string(), 2)]
        );
    }

    #[test]
    fn ordinal_distribution_follows_the_order_and_omits_absent_categories() {
        let order: Vec<String> = DEFAULT_AGE_ORDER.iter().map(|s| s.to_string()).collect();
        let ft = distribution(
            &cells(&[Some("21-24"), Some("18-20"), Some("18-20"), None, Some("30 and above")]),
            Some(order.as_slice()),
        );
        assert_eq!(
            ft.entries,
            vec![
                ("18-20".to_string(), 2),
                ("21-24".to_string(), 1),
                ("30 and above".to_string(), 1)
            ]
        );
        assert_eq!(ft.get("Under 18"), None);
    }

    #[test]
    fn languages_are_exploded() {
        let ft = explode_multi_select(
            &cells(&[Some("English, French"), Some("English"), None]),
            MULTI_SELECT_DELIMITER,
        );
        assert_eq!(
            ft.entries,
            vec![("English".to_string(), 2), ("French".to_string(), 1)]
        );
    }

    #[test]
    fn exploded_tokens_are_not_trimmed() {
        let ft = explode_multi_select(&cells(&[Some("English,  French")]), ", ");
        assert_eq!(ft.get(" French"), Some(1));
        assert_eq!(ft.get("French"), None);
    }

    #[test]
    fn exploding_ignores_row_order() {
        let rows = [
            Some("isiZulu, English"),
            Some("English"),
            None,
            Some("Afrikaans, isiZulu, English"),
            Some("Sesotho"),
        ];
        let mut reversed = rows.to_vec();
        reversed.reverse();
        let a = explode_multi_select(&cells(&rows), ", ");
        let b = explode_multi_select(&cells(&reversed), ", ");
        let mut ea = a.entries.clone();
        let mut eb = b.entries.clone();
        ea.sort();
        eb.sort();
        assert_eq!(ea, eb);
        assert_eq!(a.entries[0], ("English".to_string(), 3));
        assert_eq!(b.entries[0], ("English".to_string(), 3));
    }

    #[test]
    fn crosstab_keeps_rows_with_both_answers() {
        let ct = cross_tabulate(
            &cells(&[Some("Yes"), Some("No"), Some("Yes")]),
            &cells(&[Some("High"), None, Some("Low")]),
        );
        assert_eq!(ct.total(), 2);
        assert_eq!(ct.get("Yes", "High"), 1);
        assert_eq!(ct.get("Yes", "Low"), 1);
        assert_eq!(ct.get("No", "High"), 0);
        assert_eq!(ct.row_labels, vec!["Yes".to_string()]);
        assert_eq!(ct.column_labels, vec!["High".to_string(), "Low".to_string()]);
    }

    #[test]
    fn crosstab_total_is_bounded_by_each_column() {
        let a = cells(&[Some("x"), None, Some("y"), Some("x"), None]);
        let b = cells(&[None, Some("p"), Some("q"), Some("q"), Some("p")]);
        let ct = cross_tabulate(&a, &b);
        let non_null_a = a.iter().filter(|c| !c.is_null()).count() as u64;
        let non_null_b = b.iter().filter(|c| !c.is_null()).count() as u64;
        assert_eq!(ct.total(), 2);
        assert!(ct.total() <= non_null_a);
        assert!(ct.total() <= non_null_b);
    }

    #[test]
    fn corpus_of_an_empty_column_is_empty() {
        let corpus = text_corpus(&cells(&[None, None]));
        assert!(corpus.is_empty());
        assert_eq!(corpus.as_str(), "");
    }

    #[test]
    fn corpus_is_deterministic() {
        let c = vec![
            CellValue::from("Making friends"),
            CellValue::Null,
            CellValue::Number(42.0),
            CellValue::from("Cooking"),
        ];
        let first = text_corpus(&c);
        let second = text_corpus(&c);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "Making friends 42 Cooking");
    }

    #[test]
    fn missingness_reports_thirty_percent() {
        let mut x = cells(&[Some("a"); 10]);
        x[1] = CellValue::Null;
        x[4] = CellValue::Null;
        x[9] = CellValue::Null;
        let ds = dataset(&[("X", x), ("Y", cells(&[Some("b"); 10]))]);
        let report = missingness(&ds);
        assert_eq!(report.entries, vec![("X".to_string(), 30.0)]);
        assert_eq!(report.get("Y"), None);
    }

    #[test]
    fn missingness_is_sorted_with_stable_ties() {
        let ds = dataset(&[
            ("a", cells(&[None, Some("1"), Some("1"), Some("1")])),
            ("b", cells(&[None, None, Some("1"), Some("1")])),
            ("c", cells(&[Some("1"), None, Some("1"), Some("1")])),
            ("d", cells(&[Some("1"), Some("1"), Some("1"), Some("1")])),
        ]);
        let report = missingness(&ds);
        assert_eq!(
            report.entries,
            vec![
                ("b".to_string(), 50.0),
                ("a".to_string(), 25.0),
                ("c".to_string(), 25.0)
            ]
        );
        for (_, p) in report.entries.iter() {
            assert!(*p > 0.0 && *p <= 100.0);
        }
    }

    #[test]
    fn coercion_maps_unparsable_values_to_none() {
        let c = vec![
            CellValue::from("19"),
            CellValue::from("18-20"),
            CellValue::Number(21.0),
            CellValue::Null,
        ];
        assert_eq!(coerce_numeric(&c), vec![Some(19.0), None, Some(21.0), None]);
    }

    #[test]
    fn histogram_has_equal_width_bins() {
        let c: Vec<CellValue> = [18.0, 19.0, 20.0, 28.0]
            .iter()
            .map(|f| CellValue::Number(*f))
            .chain(std::iter::once(CellValue::from("unknown")))
            .collect();
        let h = numeric_histogram(&c, 10);
        assert_eq!(h.bins.len(), 10);
        assert_eq!(h.total(), 4);
        assert_eq!(h.bins[0].lower, 18.0);
        assert_eq!(h.bins[9].upper, 28.0);
        assert_eq!(h.bins[0].count, 1);
        assert_eq!(h.bins[1].count, 1);
        assert_eq!(h.bins[2].count, 1);
        assert_eq!(h.bins[9].count, 1);
    }

    #[test]
    fn histogram_of_a_constant_column() {
        let h = numeric_histogram(&[CellValue::Number(20.0), CellValue::Number(20.0)], 2);
        assert_eq!(h.bins[0].lower, 19.5);
        assert_eq!(h.bins[1].upper, 20.5);
        assert_eq!(h.bins[1].count, 2);
    }

    #[test]
    fn histogram_counts_values_within_the_reported_edges() {
        let values: Vec<f64> = (0..=100).map(|i| i as f64 * 0.07).collect();
        let all: Vec<CellValue> = values.iter().map(|f| CellValue::Number(*f)).collect();
        let reference = numeric_histogram(&all, 10);
        for v in values.iter() {
            // Same edges as the full histogram, with the value counted once more.
            let mut c = all.clone();
            c.push(CellValue::Number(*v));
            let h = numeric_histogram(&c, 10);
            let idx = h
                .bins
                .iter()
                .zip(reference.bins.iter())
                .position(|(b, r)| b.count != r.count)
                .unwrap();
            let bin = &h.bins[idx];
            assert!(bin.lower <= *v, "{} below bin {:?}", v, bin);
            if idx + 1 < h.bins.len() {
                assert!(*v < bin.upper, "{} above bin {:?}", v, bin);
            } else {
                assert!(*v <= bin.upper, "{} above bin {:?}", v, bin);
            }
        }
    }

    #[test]
    fn histogram_without_numbers_is_empty() {
        let h = numeric_histogram(&cells(&[Some("n/a"), None]), 10);
        assert!(h.bins.is_empty());
    }

    #[test]
    fn terms_drop_stop_words() {
        let corpus = TextCorpus {
            text: "Making new friends. Friends and the food! Living away from home's comfort"
                .to_string(),
        };
        let ft = top_terms(&corpus, 3);
        assert_eq!(ft.entries[0], ("friends".to_string(), 2));
        assert_eq!(ft.entries.len(), 3);
        assert_eq!(ft.get("the"), None);
        assert_eq!(
            terms("home's 2024 a b"),
            vec!["home".to_string()]
        );
    }

    #[test]
    fn run_analysis_skips_missing_topics() {
        let ds = dataset(&[("What is your gender?", cells(&[Some("Female")]))]);
        let cat = ColumnCatalogue::residence_survey();
        let out = run_analysis(
            &ds,
            &cat,
            &Analysis::CrossTab(Topic::Gender, Topic::AwarenessWarden),
            &AnalysisOptions::default(),
        );
        assert_eq!(
            out,
            AnalysisOutcome::Skipped {
                missing: vec![Topic::AwarenessWarden]
            }
        );
    }

    #[test]
    fn run_analysis_reports_insufficient_data() {
        let cat = ColumnCatalogue::residence_survey();
        let ds = dataset(&[
            (
                "What do you think will be your biggest challenge in transitioning to residence life?",
                cells(&[None, None]),
            ),
            ("What is your gender?", cells(&[Some("Male"), None])),
            (
                "How familiar are you with the role of the residence warden in supporting students during their transition to university?",
                cells(&[None, Some("Very")]),
            ),
        ]);
        let opts = AnalysisOptions::default();
        assert_eq!(
            run_analysis(&ds, &cat, &Analysis::Corpus(Topic::Challenges), &opts),
            AnalysisOutcome::InsufficientData
        );
        assert_eq!(
            run_analysis(
                &ds,
                &cat,
                &Analysis::CrossTab(Topic::Gender, Topic::AwarenessWarden),
                &opts
            ),
            AnalysisOutcome::InsufficientData
        );
    }

    #[test]
    fn corpus_without_any_term_is_insufficient() {
        let cat = ColumnCatalogue::residence_survey();
        let ds = dataset(&[(
            "What do you think will be your biggest challenge in transitioning to residence life?",
            cells(&[Some("-"), Some("N/A ... ?"), Some("I am not, 2"), None]),
        )]);
        assert_eq!(
            run_analysis(
                &ds,
                &cat,
                &Analysis::Corpus(Topic::Challenges),
                &AnalysisOptions::default()
            ),
            AnalysisOutcome::InsufficientData
        );
    }

    #[test]
    fn run_analysis_computes_the_language_tally() {
        let cat = ColumnCatalogue::residence_survey();
        let ds = dataset(&[(
            "What language(s) do you primarily speak at home? (Select all that apply)",
            cells(&[Some("English, French"), Some("English"), None]),
        )]);
        let out = run_analysis(
            &ds,
            &cat,
            &Analysis::MultiSelect(Topic::Languages),
            &AnalysisOptions::default(),
        );
        match out {
            AnalysisOutcome::Ready(AnalysisResult::Frequencies(ft)) => {
                assert_eq!(ft.total(), 3);
                assert_eq!(ft.get("English"), Some(2));
            }
            x => panic!("unexpected outcome {:?}", x),
        }
    }

    #[test]
    fn missingness_runs_without_any_topic() {
        let ds = dataset(&[("a", cells(&[Some("x"), None]))]);
        let out = run_analysis(
            &ds,
            &ColumnCatalogue::empty(),
            &Analysis::Missingness,
            &AnalysisOptions::default(),
        );
        assert_eq!(
            out,
            AnalysisOutcome::Ready(AnalysisResult::Missingness(MissingnessReport {
                entries: vec![("a".to_string(), 50.0)]
            }))
        );
    }
}
