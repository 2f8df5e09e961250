use std::collections::BTreeSet;

use super::model::{Dataset, Domain, Record};

// ---------------------------------------------------------------------------
// Filter state: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Current selections for each filter dimension plus the global top-N override.
///
/// An empty set is a valid selection and simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub locations: BTreeSet<String>,
    pub sexes: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    /// Rank across every location, ignoring `locations`.
    pub global_top_mode: bool,
}

impl FilterState {
    /// Session defaults: all sexes, all years, no locations, global mode off.
    pub fn defaults(domain: &Domain) -> Self {
        Self {
            locations: BTreeSet::new(),
            sexes: domain.sexes.clone(),
            years: domain.years.clone(),
            global_top_mode: false,
        }
    }

    /// Restore the session defaults regardless of the current selections.
    pub fn reset(&mut self, domain: &Domain) {
        *self = Self::defaults(domain);
    }

    pub fn set_locations(&mut self, locations: BTreeSet<String>) {
        self.locations = locations;
    }

    pub fn set_sexes(&mut self, sexes: BTreeSet<String>) {
        self.sexes = sexes;
    }

    pub fn set_years(&mut self, years: BTreeSet<i32>) {
        self.years = years;
    }

    pub fn set_global_top_mode(&mut self, enabled: bool) {
        self.global_top_mode = enabled;
    }

    pub fn toggle_location(&mut self, location: &str) {
        toggle(&mut self.locations, &location.to_string());
    }

    pub fn toggle_sex(&mut self, sex: &str) {
        toggle(&mut self.sexes, &sex.to_string());
    }

    pub fn toggle_year(&mut self, year: i32) {
        toggle(&mut self.years, &year);
    }

    /// The location selection has no effect while global mode is on.
    pub fn locations_editable(&self) -> bool {
        !self.global_top_mode
    }

    /// Derive the row predicate for the current mode.
    pub fn predicate(&self) -> Predicate<'_> {
        if self.global_top_mode {
            Predicate::Global {
                sexes: &self.sexes,
                years: &self.years,
            }
        } else {
            Predicate::Explicit {
                locations: &self.locations,
                sexes: &self.sexes,
                years: &self.years,
            }
        }
    }
}

fn toggle<T: Ord + Clone>(set: &mut BTreeSet<T>, value: &T) {
    if !set.remove(value) {
        set.insert(value.clone());
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Row predicate, one variant per filter mode.
///
/// `Global` has no location clause at all, so the location selection cannot
/// leak into the result while the override is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    Global {
        sexes: &'a BTreeSet<String>,
        years: &'a BTreeSet<i32>,
    },
    Explicit {
        locations: &'a BTreeSet<String>,
        sexes: &'a BTreeSet<String>,
        years: &'a BTreeSet<i32>,
    },
}

impl Predicate<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        match *self {
            Predicate::Global { sexes, years } => {
                sexes.contains(&record.sex_name) && years.contains(&record.year_id)
            }
            Predicate::Explicit {
                locations,
                sexes,
                years,
            } => {
                locations.contains(&record.location_name)
                    && sexes.contains(&record.sex_name)
                    && years.contains(&record.year_id)
            }
        }
    }
}

/// Return indices of records that pass the current filters, in table order.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    let predicate = filters.predicate();
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| predicate.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the records that pass the current filters, in table order.
pub fn filtered_subset<'a>(dataset: &'a Dataset, filters: &FilterState) -> Vec<&'a Record> {
    let predicate = filters.predicate();
    dataset
        .records
        .iter()
        .filter(|rec| predicate.matches(rec))
        .collect()
}
