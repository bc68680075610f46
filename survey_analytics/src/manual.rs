/*!

This is the long-form manual for `survey_analytics` and `survey_insights`.

## Input formats

The following formats are supported:
* `xlsx` Excel workbook, as exported by Microsoft Forms or Google Forms
* `csv` Comma Separated Values with a header row

In both cases the first row holds the question labels and every following row is one
respondent. Empty cells are read as missing answers, and so are the markers that
spreadsheet tools write for them (`#N/A`, `N/A`, `n/a`, `NA`, `NULL`, `null`, `NaN`,
`nan`). In a CSV file a field that parses as a number is read as a number.

A label that appears several times in the header row is renamed: the second `Q`
becomes `Q.1`, the third `Q.2`, and so on.

### `xlsx`

The worksheet is selected with `--excel-worksheet-name` (or `excelWorksheetName` in the
configuration file). Without it, the sheet named `Sheet1` is used, or the only sheet of
the workbook.

## Question labels

Questions are found by their exact label in the header row. Exports sometimes carry
invisible characters: the residence survey has a non-breaking space (U+00A0) in front of
`What are you most excited about when thinking of living in the residence?`. Such
characters are part of the label. If a question was renamed between two exports, its
label can be overridden in the configuration file with the `topics` map.

When a question cannot be found, the views that need it are skipped and listed as
`skipped` in the summary. The rest of the report is still produced.

## Sections

| section name    | views                                                         |
|-----------------|---------------------------------------------------------------|
| `demographics`  | gender, age brackets, age histogram, languages spoken at home |
| `readiness`     | one distribution per readiness question                       |
| `correlation`   | preparedness vs each awareness question                       |
| `word_clouds`   | biggest challenges, most exciting aspects                     |
| `missing_data`  | percentage of empty cells per question                        |

Without `--section`, all the sections are computed.

## Configuration file

```json
{
  "outputSettings": { "reportName": "Residence survey", "outputPath": "summary.json" },
  "dataSource": { "provider": "xlsx", "filePath": "list.xlsx", "excelWorksheetName": "Sheet1" },
  "topics": { "gender": "What is your gender?" },
  "ageOrder": ["Under 18", "18-20", "21-24", "25-29", "30 and above"],
  "multiSelectDelimiter": ", ",
  "histogramBins": 10,
  "topTerms": 30,
  "sections": ["demographics", "missing_data"]
}
```

All the fields are optional. The file path is relative to the configuration file.
Command line flags take precedence over the configuration file.

*/
