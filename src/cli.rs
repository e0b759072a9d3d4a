use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "census-extract",
    version,
    about = "Population extraction from ELSTAT census booklet tables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract administrative-region populations keyed by NUTS2 codes.
    Regions(RegionsArgs),
    /// Extract municipality populations keyed by ELSTAT codes.
    Municipalities(MunicipalitiesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RegionsArgs {
    /// Directory holding the raw per-table CSVs produced by table extraction.
    #[arg(long, default_value = "data/raw/csv")]
    pub csv_dir: PathBuf,

    /// Two-column (code, name) table of NUTS2 (2021) region codes.
    #[arg(long, default_value = "data/raw/nuts2_region_codes.csv")]
    pub codes_path: PathBuf,

    #[arg(long, default_value = "data/adm_regions/populations.csv")]
    pub out_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct MunicipalitiesArgs {
    /// Directory holding the raw per-table CSVs produced by table extraction.
    #[arg(long, default_value = "data/raw/csv")]
    pub csv_dir: PathBuf,

    /// Two-column (code, name) table of ELSTAT municipality codes.
    #[arg(long, default_value = "data/raw/elstat_municipality_codes.csv")]
    pub codes_path: PathBuf,

    #[arg(long, default_value = "data/municipalities/populations.csv")]
    pub out_path: PathBuf,
}
