use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use regex::Regex;
use tracing::info;

use crate::cli::MunicipalitiesArgs;
use crate::codes::load_code_table;
use crate::extract::{extract_name_and_first_number, parse_grouped_number, population_regex};
use crate::model::{MUNICIPALITY_COLUMNS, MunicipalityRecord};
use crate::util::{discover_input_files, ensure_parent_directory};

/// Name+2011-total cell, then total/men/women cells for 2011 and 2021.
const MIN_ROW_CELLS: usize = 6;

const INPUT_GLOB: &str = "mun*.csv";

pub fn run(args: MunicipalitiesArgs) -> Result<()> {
    let codes = load_code_table(&args.codes_path)?;
    let pattern = population_regex()?;
    let files = discover_input_files(&args.csv_dir, INPUT_GLOB)?;

    ensure_parent_directory(&args.out_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.out_path)
        .with_context(|| format!("failed to create output file: {}", args.out_path.display()))?;
    writer
        .write_record(MUNICIPALITY_COLUMNS)
        .context("failed to write output header")?;

    let mut records_written = 0usize;
    let mut unmatched_names = 0usize;

    for path in &files {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut rows = 0usize;
        for row in reader.records() {
            let row = row.with_context(|| format!("malformed CSV row in {}", path.display()))?;

            // Blank first cells mark decorative rows in the source tables.
            if row.get(0).is_none_or(str::is_empty) {
                continue;
            }

            let cells = repair_row(&row);
            let record = build_record(&pattern, &codes, &cells).with_context(|| {
                format!("could not parse row {cells:?} in {}", path.display())
            })?;

            if record.elstat_municipality_code.is_empty() {
                unmatched_names += 1;
            }

            writer.serialize(&record).with_context(|| {
                format!("failed to write record to {}", args.out_path.display())
            })?;
            rows += 1;
        }

        records_written += rows;
        info!(path = %path.display(), rows, "processed municipality table");
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush output file: {}", args.out_path.display()))?;

    info!(
        files = files.len(),
        records = records_written,
        unmatched_names,
        out = %args.out_path.display(),
        "municipality extraction complete"
    );

    Ok(())
}

/// Cells 2-5 sometimes arrive merged into cell 2 as a single newline-separated
/// value; split the merged cell back into discrete cells.
fn repair_row(row: &StringRecord) -> Vec<String> {
    let mut cells = Vec::with_capacity(row.len());

    for (index, cell) in row.iter().enumerate() {
        if index == 2 && cell.contains('\n') {
            cells.extend(cell.split('\n').map(str::to_owned));
        } else {
            cells.push(cell.to_owned());
        }
    }

    cells
}

fn build_record(
    pattern: &Regex,
    codes: &HashMap<String, String>,
    cells: &[String],
) -> Result<MunicipalityRecord> {
    let blob = cells.first().context("row has no name column")?;
    let (municipality_name, pop_total_2011) = extract_name_and_first_number(pattern, blob)?;

    if cells.len() < MIN_ROW_CELLS {
        bail!(
            "expected at least {MIN_ROW_CELLS} columns, found {}",
            cells.len()
        );
    }

    // Booklet columns run 2011 before 2021; the output schema leads with 2021.
    Ok(MunicipalityRecord {
        elstat_municipality_code: codes.get(&municipality_name).cloned().unwrap_or_default(),
        municipality_name,
        pop_total_2021: parse_grouped_number(&cells[1])?,
        pop_total_2011,
        pop_men_2021: parse_grouped_number(&cells[3])?,
        pop_men_2011: parse_grouped_number(&cells[2])?,
        pop_women_2021: parse_grouped_number(&cells[5])?,
        pop_women_2011: parse_grouped_number(&cells[4])?,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn sample_codes() -> HashMap<String, String> {
        HashMap::from([("ΚΟΜΟΤΗΝΗΣ".to_owned(), "9101".to_owned())])
    }

    fn owned(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_owned()).collect()
    }

    #[test]
    fn merged_cell_expands_into_discrete_cells() {
        let row = StringRecord::from(vec!["ΚΟΜΟΤΗΝΗΣ\n66.919", "65.107", "10\n20\n30\n40"]);

        let cells = repair_row(&row);

        assert_eq!(
            cells,
            owned(&["ΚΟΜΟΤΗΝΗΣ\n66.919", "65.107", "10", "20", "30", "40"])
        );
    }

    #[test]
    fn well_formed_row_passes_through_repair_unchanged() {
        let row = StringRecord::from(vec!["ΚΟΜΟΤΗΝΗΣ\n66.919", "65.107", "10", "20", "30", "40"]);

        assert_eq!(repair_row(&row), owned(&row.iter().collect::<Vec<&str>>()));
    }

    #[test]
    fn assembles_record_with_swapped_year_pairs() {
        let pattern = population_regex().unwrap();
        let cells = owned(&[
            "ΚΟΜΟΤΗΝΗΣ\n66.919",
            "65.107",
            "33.013",
            "31.965",
            "33.906",
            "33.142",
        ]);

        let record = build_record(&pattern, &sample_codes(), &cells).unwrap();

        assert_eq!(record.elstat_municipality_code, "9101");
        assert_eq!(record.municipality_name, "ΚΟΜΟΤΗΝΗΣ");
        assert_eq!(record.pop_total_2021, 65_107);
        assert_eq!(record.pop_total_2011, 66_919);
        assert_eq!(record.pop_men_2021, 31_965);
        assert_eq!(record.pop_men_2011, 33_013);
        assert_eq!(record.pop_women_2021, 33_142);
        assert_eq!(record.pop_women_2011, 33_906);
    }

    #[test]
    fn wrapped_name_resolves_after_rejoining() {
        let pattern = population_regex().unwrap();
        let codes =
            HashMap::from([("ΑΜΠΕΛΟΚΗΠΩΝ - ΜΕΝΕΜΕΝΗΣ".to_owned(), "9115".to_owned())]);
        let cells = owned(&[
            "ΑΜΠΕΛΟΚΗΠΩΝ -  \n52.127\nΜΕΝΕΜΕΝΗΣ",
            "49.674",
            "25.338",
            "23.935",
            "26.789",
            "25.739",
        ]);

        let record = build_record(&pattern, &codes, &cells).unwrap();

        assert_eq!(record.elstat_municipality_code, "9115");
        assert_eq!(record.municipality_name, "ΑΜΠΕΛΟΚΗΠΩΝ - ΜΕΝΕΜΕΝΗΣ");
        assert_eq!(record.pop_total_2011, 52_127);
    }

    #[test]
    fn unmatched_name_resolves_to_empty_code() {
        let pattern = population_regex().unwrap();
        let cells = owned(&["ΑΓΝΩΣΤΟΥ\n1", "2", "3", "4", "5", "6"]);

        let record = build_record(&pattern, &sample_codes(), &cells).unwrap();

        assert_eq!(record.elstat_municipality_code, "");
        assert_eq!(record.municipality_name, "ΑΓΝΩΣΤΟΥ");
    }

    #[test]
    fn short_row_is_rejected() {
        let pattern = population_regex().unwrap();
        let cells = owned(&["ΚΟΜΟΤΗΝΗΣ\n66.919", "65.107", "33.013"]);

        let err = build_record(&pattern, &sample_codes(), &cells).unwrap_err();

        assert!(err.to_string().contains("expected at least 6 columns"));
    }

    #[test]
    fn name_cell_without_figure_is_rejected() {
        let pattern = population_regex().unwrap();
        let cells = owned(&["ΚΟΜΟΤΗΝΗΣ", "65.107", "33.013", "31.965", "33.906", "33.142"]);

        let err = build_record(&pattern, &sample_codes(), &cells).unwrap_err();

        assert!(err.to_string().contains("no population figure"));
    }

    fn temp_workspace(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("census-extract-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("raw")).unwrap();
        dir
    }

    #[test]
    fn pipeline_skips_blank_rows_and_repairs_merged_cells() {
        let dir = temp_workspace("municipalities-pipeline");
        fs::write(dir.join("codes.csv"), "9101,ΚΟΜΟΤΗΝΗΣ\n").unwrap();
        fs::write(
            dir.join("raw").join("mun01.csv"),
            concat!(
                "\"ΚΟΜΟΤΗΝΗΣ\n66.919\",65.107,\"33.013\n31.965\n33.906\n33.142\"\n",
                ",decorative,row\n",
                "\"ΑΓΝΩΣΤΟΥ\n1\",2,3,4,5,6\n",
            ),
        )
        .unwrap();

        let out_path = dir.join("out").join("populations.csv");
        run(MunicipalitiesArgs {
            csv_dir: dir.join("raw"),
            codes_path: dir.join("codes.csv"),
            out_path: out_path.clone(),
        })
        .unwrap();

        let output = fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "elstat_municipality_code,municipality_name,pop_total_2021,pop_total_2011,\
             pop_men_2021,pop_men_2011,pop_women_2021,pop_women_2011"
        );
        assert_eq!(lines[1], "9101,ΚΟΜΟΤΗΝΗΣ,65107,66919,31965,33013,33142,33906");
        assert_eq!(lines[2], ",ΑΓΝΩΣΤΟΥ,2,1,4,3,6,5");
        assert_eq!(lines.len(), 3);
    }
}
