use serde::Deserialize;

use crate::scholarships::{ScholarshipRecord, ANY_CITIZENSHIP, ANY_EU_COUNTRY};

/// Criteria for a scholarship lookup. Only citizenship is mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScholarshipQuery {
    #[serde(default)]
    pub citizenship: String,
    #[serde(default, alias = "target_country")]
    pub country: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Returns the records matching `query`, preserving input order.
///
/// - citizenship: case-insensitive equality with any eligible entry, or the list holds "all"
/// - country: case-insensitive equality, or the requested country is exactly "EU", or none requested
/// - name: case-insensitive substring, or none requested
pub fn filter<'a>(
    records: &'a [ScholarshipRecord],
    query: &ScholarshipQuery,
) -> Vec<&'a ScholarshipRecord> {
    let citizenship = query.citizenship.trim().to_lowercase();
    let country = non_blank(query.country.as_deref())
        .filter(|c| *c != ANY_EU_COUNTRY)
        .map(str::to_lowercase);
    let name = non_blank(query.name.as_deref()).map(str::to_lowercase);

    records
        .iter()
        .filter(|r| citizenship_matches(r, &citizenship))
        .filter(|r| match &country {
            Some(c) => r.target_country.to_lowercase() == *c,
            None => true,
        })
        .filter(|r| match &name {
            Some(n) => r.name.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .collect()
}

fn citizenship_matches(record: &ScholarshipRecord, citizenship: &str) -> bool {
    record.eligible_citizenships.iter().any(|c| {
        let c = c.trim().to_lowercase();
        c == ANY_CITIZENSHIP || c == citizenship
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
