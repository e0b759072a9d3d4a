use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use regex::Regex;
use tracing::info;

use crate::cli::RegionsArgs;
use crate::codes::load_code_table;
use crate::extract::{extract_name_and_numbers, population_regex};
use crate::model::{REGION_COLUMNS, RegionRecord};
use crate::util::{discover_input_files, ensure_parent_directory};

/// Figures a region cell must carry: total/men/women for 2011 and 2021.
const EXPECTED_FIGURES: usize = 6;

const INPUT_GLOB: &str = "adm*.csv";

pub fn run(args: RegionsArgs) -> Result<()> {
    let codes = load_code_table(&args.codes_path)?;
    let pattern = population_regex()?;
    let files = discover_input_files(&args.csv_dir, INPUT_GLOB)?;

    ensure_parent_directory(&args.out_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.out_path)
        .with_context(|| format!("failed to create output file: {}", args.out_path.display()))?;
    writer
        .write_record(REGION_COLUMNS)
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
            let record = build_record(&pattern, &codes, &row).with_context(|| {
                format!(
                    "could not parse row {:?} in {}",
                    row.iter().collect::<Vec<&str>>(),
                    path.display()
                )
            })?;

            if record.region_code.is_empty() {
                unmatched_names += 1;
            }

            writer.serialize(&record).with_context(|| {
                format!("failed to write record to {}", args.out_path.display())
            })?;
            rows += 1;
        }

        records_written += rows;
        info!(path = %path.display(), rows, "processed region table");
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush output file: {}", args.out_path.display()))?;

    info!(
        files = files.len(),
        records = records_written,
        unmatched_names,
        out = %args.out_path.display(),
        "region extraction complete"
    );

    Ok(())
}

fn build_record(
    pattern: &Regex,
    codes: &HashMap<String, String>,
    row: &StringRecord,
) -> Result<RegionRecord> {
    let blob = row.get(1).context("row has no name+figures column")?;
    let (region_name, figures) = extract_name_and_numbers(pattern, blob)?;

    if figures.len() != EXPECTED_FIGURES {
        bail!(
            "expected {EXPECTED_FIGURES} population figures, found {}",
            figures.len()
        );
    }

    // Booklet columns run 2011 before 2021; the output schema leads with 2021.
    Ok(RegionRecord {
        region_code: codes.get(&region_name).cloned().unwrap_or_default(),
        region_name,
        pop_total_2021: figures[1],
        pop_total_2011: figures[0],
        pop_men_2021: figures[3],
        pop_men_2011: figures[2],
        pop_women_2021: figures[5],
        pop_women_2011: figures[4],
    })
}
