use anyhow::{Context, Result};
use regex::Regex;

/// One population figure as printed in the booklet: digit groups separated by
/// dot thousands separators, e.g. `336.856` or `1.234.567`.
const POPULATION_PATTERN: &str = r"(?:\d+\.)*\d+";

pub fn population_regex() -> Result<Regex> {
    Regex::new(POPULATION_PATTERN).context("failed to compile population figure regex")
}

/// Parses a figure written with dot thousands separators into an integer.
pub fn parse_grouped_number(text: &str) -> Result<u64> {
    text.trim()
        .replace('.', "")
        .parse::<u64>()
        .with_context(|| format!("invalid population figure: {text:?}"))
}

/// Splits a blended name+figures column into the residual name and every
/// population figure it contains.
///
/// The booklet prints the name and the population columns without separating
/// lines, so table extraction collapses them into a single cell of the form
/// `"ΗΠΕΙΡΟΥ\n336.856\n319.543\n..."`. Figures are returned in the order they
/// appear in the cell; callers assign meaning by position.
pub fn extract_name_and_numbers(pattern: &Regex, blob: &str) -> Result<(String, Vec<u64>)> {
    let mut numbers = Vec::with_capacity(6);
    for figure in pattern.find_iter(blob) {
        numbers.push(parse_grouped_number(figure.as_str())?);
    }

    Ok((residual_name(pattern, blob), numbers))
}

/// Municipality variant: only the first figure in the cell belongs to the
/// name column (the 2011 total); the remaining columns arrive as separate
/// cells. A name long enough to wrap onto a second physical line lands after
/// the figure, e.g. `"ΑΜΠΕΛΟΚΗΠΩΝ -  \n52.127\nΜΕΝΕΜΕΝΗΣ"`, so the name is
/// rebuilt from the whole cell rather than the text before the match.
pub fn extract_name_and_first_number(pattern: &Regex, blob: &str) -> Result<(String, u64)> {
    let figure = pattern
        .find(blob)
        .with_context(|| format!("no population figure found in first column: {blob:?}"))?;
    let number = parse_grouped_number(figure.as_str())?;

    Ok((residual_name(pattern, blob), number))
}

/// Removes every figure from the cell and collapses the remaining whitespace,
/// rejoining wrapped name lines with single spaces.
fn residual_name(pattern: &Regex, blob: &str) -> String {
    let stripped = pattern.replace_all(blob, "");
    stripped.split_whitespace().collect::<Vec<&str>>().join(" ")
}
