use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Loads a two-column (code, name) CSV into a name => code reverse lookup.
///
/// Names are assumed unique in the source table; a duplicated name keeps the
/// last code seen.
pub fn load_code_table(path: &Path) -> Result<HashMap<String, String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open code table: {}", path.display()))?;

    read_code_table(file).with_context(|| format!("failed to read code table: {}", path.display()))
}

fn read_code_table<R: Read>(reader: R) -> Result<HashMap<String, String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut codes = HashMap::new();
    for row in csv_reader.records() {
        let row = row.context("malformed code table row")?;
        let code = row.get(0).context("code table row has no code column")?;
        let name = row.get(1).context("code table row has no name column")?;

        codes.insert(name.to_owned(), code.to_owned());
    }

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_reverse_lookup_from_code_name_rows() {
        let table = "EL54,Ηπείρου\nEL61,Θεσσαλίας\n";

        let codes = read_code_table(table.as_bytes()).unwrap();

        assert_eq!(codes.len(), 2);
        assert_eq!(codes.get("Ηπείρου").map(String::as_str), Some("EL54"));
        assert_eq!(codes.get("Θεσσαλίας").map(String::as_str), Some("EL61"));
    }

    #[test]
    fn duplicated_name_keeps_last_code() {
        let table = "9101,ΚΟΜΟΤΗΝΗΣ\n9999,ΚΟΜΟΤΗΝΗΣ\n";

        let codes = read_code_table(table.as_bytes()).unwrap();

        assert_eq!(codes.get("ΚΟΜΟΤΗΝΗΣ").map(String::as_str), Some("9999"));
    }

    #[test]
    fn row_without_name_column_is_an_error() {
        // A lone field on the first row fixes the expected width at one
        // column, so the name lookup fails.
        let err = read_code_table("EL54\n".as_bytes()).unwrap_err();

        assert!(err.to_string().contains("name column"));
    }

    #[test]
    fn missing_file_propagates_path_in_error() {
        let err = load_code_table(Path::new("does/not/exist.csv")).unwrap_err();

        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
