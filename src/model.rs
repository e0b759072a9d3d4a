use serde::Serialize;

/// Output columns of the region pipeline, in emission order.
pub const REGION_COLUMNS: [&str; 8] = [
    "region_code",
    "region_name",
    "pop_total_2021",
    "pop_total_2011",
    "pop_men_2021",
    "pop_men_2011",
    "pop_women_2021",
    "pop_women_2011",
];

/// Output columns of the municipality pipeline, in emission order.
pub const MUNICIPALITY_COLUMNS: [&str; 8] = [
    "elstat_municipality_code",
    "municipality_name",
    "pop_total_2021",
    "pop_total_2011",
    "pop_men_2021",
    "pop_men_2011",
    "pop_women_2021",
    "pop_women_2011",
];

/// One administrative region with its census totals. Field order matches
/// [`REGION_COLUMNS`].
#[derive(Debug, Clone, Serialize)]
pub struct RegionRecord {
    pub region_code: String,
    pub region_name: String,
    pub pop_total_2021: u64,
    pub pop_total_2011: u64,
    pub pop_men_2021: u64,
    pub pop_men_2011: u64,
    pub pop_women_2021: u64,
    pub pop_women_2011: u64,
}

/// One municipality with its census totals. Field order matches
/// [`MUNICIPALITY_COLUMNS`].
#[derive(Debug, Clone, Serialize)]
pub struct MunicipalityRecord {
    pub elstat_municipality_code: String,
    pub municipality_name: String,
    pub pop_total_2021: u64,
    pub pop_total_2011: u64,
    pub pop_men_2021: u64,
    pub pop_men_2011: u64,
    pub pop_women_2021: u64,
    pub pop_women_2011: u64,
}
