//! Lead row fixtures.

use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};

/// Regions cycled through by [`lead_rows`]. Only "Europe" contains "eu".
pub const REGIONS: [&str; 4] = ["Europe", "Asia", "North America", "Oceania"];

/// Industries cycled through by [`lead_rows`].
pub const INDUSTRIES: [&str; 3] = ["Technology", "Finance", "Healthcare"];

const JOB_TITLES: [&str; 5] = ["CTO", "Engineer", "Analyst", "VP Sales", "Designer"];

const LOCATIONS: [&str; 3] = ["Berlin", "Tokyo", "Boston, MA"];

/// RFC 3339 timestamp `hours` after 2024-01-01T00:00:00Z.
pub fn timestamp(hours: i64) -> String {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (base + Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// One lead row; higher ids are newer.
pub fn lead_row(i: usize) -> Value {
    json!({
        "id": i as i64,
        "company": format!("Company {i:03}"),
        "region": REGIONS[i % REGIONS.len()],
        "industry": INDUSTRIES[i % INDUSTRIES.len()],
        "job_title": JOB_TITLES[i % JOB_TITLES.len()],
        "location": LOCATIONS[i % LOCATIONS.len()],
        "created_at": timestamp(i as i64),
    })
}

/// `count` lead rows with ids `0..count`.
pub fn lead_rows(count: usize) -> Vec<Value> {
    (0..count).map(lead_row).collect()
}

/// The `id` of every row in a response `data` array.
pub fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .expect("response has a data array")
        .iter()
        .map(|row| row["id"].as_i64().expect("row has an id"))
        .collect()
}
