use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single cell of the GBD table: mean age at death for one location/sex/year.
///
/// Only the four columns the explorer needs are kept; the IHME export carries
/// more (measure, metric, bounds) which are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub location_name: String,
    /// One of `"Male"`, `"Female"`, `"Both"` in the published data.
    pub sex_name: String,
    pub year_id: i32,
    /// Mean age at death, in years.
    pub val: f64,
}

impl Record {
    pub fn new(location: &str, sex: &str, year: i32, val: f64) -> Self {
        Self {
            location_name: location.to_string(),
            sex_name: sex.to_string(),
            year_id: year,
            val,
        }
    }
}

// ---------------------------------------------------------------------------
// Domain – the selectable values of each filter dimension
// ---------------------------------------------------------------------------

/// Sorted unique values per filter dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub locations: BTreeSet<String>,
    pub sexes: BTreeSet<String>,
    pub years: BTreeSet<i32>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Never mutated after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub domain: Domain,
}

impl Dataset {
    /// Build the filter domain from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut domain = Domain::default();
        for rec in &records {
            domain.locations.insert(rec.location_name.clone());
            domain.sexes.insert(rec.sex_name.clone());
            domain.years.insert(rec.year_id);
        }
        Dataset { records, domain }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
