use std::collections::{BTreeMap, HashMap};

use super::model::Record;

/// Number of locations shown in the ranked bar chart.
pub const DEFAULT_TOP_N: usize = 12;
/// Number of equal-width histogram buckets.
pub const DEFAULT_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Running mean accumulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Group-by mean that keeps groups in the order their key is first seen.
fn grouped_means<'a, K, F>(subset: &[&'a Record], key: F) -> Vec<(K, f64)>
where
    K: std::hash::Hash + Eq + Clone,
    F: Fn(&'a Record) -> K,
{
    let mut order: Vec<(K, MeanAcc)> = Vec::new();
    let mut slots: HashMap<K, usize> = HashMap::new();
    for &rec in subset {
        let k = key(rec);
        let slot = *slots.entry(k.clone()).or_insert_with(|| {
            order.push((k, MeanAcc::default()));
            order.len() - 1
        });
        order[slot].1.push(rec.val);
    }
    order.into_iter().map(|(k, acc)| (k, acc.mean())).collect()
}

// ---------------------------------------------------------------------------
// Overall summary
// ---------------------------------------------------------------------------

/// Mean / min / max of `val` over the filtered subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// `None` when the subset is empty; the caller shows a "no data" indicator.
pub fn overall_summary(subset: &[&Record]) -> Option<OverallSummary> {
    let first = subset.first()?;
    let mut acc = MeanAcc::default();
    let mut min = first.val;
    let mut max = first.val;
    for rec in subset {
        acc.push(rec.val);
        min = min.min(rec.val);
        max = max.max(rec.val);
    }
    Some(OverallSummary {
        mean: acc.mean(),
        min,
        max,
        count: acc.count,
    })
}

// ---------------------------------------------------------------------------
// Group-by means
// ---------------------------------------------------------------------------

/// Mean `val` per sex, in first-seen order.
pub fn by_sex(subset: &[&Record]) -> Vec<(String, f64)> {
    grouped_means(subset, |r| r.sex_name.clone())
}

/// Mean `val` per location, in first-seen order. Feeds the map view.
pub fn by_location(subset: &[&Record]) -> Vec<(String, f64)> {
    grouped_means(subset, |r| r.location_name.clone())
}

/// Per-location means sorted descending, truncated to `limit`.
///
/// Equal means are ordered alphabetically by location name.
pub fn ranked_by_location(subset: &[&Record], limit: usize) -> Vec<(String, f64)> {
    let mut ranked = by_location(subset);
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Mean `val` per (year, sex), sorted by year then sex name.
pub fn by_year_and_sex(subset: &[&Record]) -> Vec<(i32, String, f64)> {
    let mut groups: BTreeMap<(i32, &str), MeanAcc> = BTreeMap::new();
    for rec in subset {
        groups
            .entry((rec.year_id, rec.sex_name.as_str()))
            .or_default()
            .push(rec.val);
    }
    groups
        .into_iter()
        .map(|((year, sex), acc)| (year, sex.to_string(), acc.mean()))
        .collect()
}

/// Mean `val` per year, ascending by year.
pub fn by_year(subset: &[&Record]) -> Vec<(i32, f64)> {
    let mut groups: BTreeMap<i32, MeanAcc> = BTreeMap::new();
    for rec in subset {
        groups.entry(rec.year_id).or_default().push(rec.val);
    }
    groups
        .into_iter()
        .map(|(year, acc)| (year, acc.mean()))
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One equal-width bucket. `start` is inclusive; `end` is exclusive except for
/// the last bucket, which also holds the maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bucket {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Equal-width buckets spanning `[min, max]` of the subset.
///
/// A subset whose values are all equal collapses to one zero-width bucket.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
pub fn histogram_buckets(subset: &[&Record], nbins: usize) -> Vec<Bucket> {
    let Some(summary) = overall_summary(subset) else {
        return Vec::new();
    };
    if nbins == 0 {
        return Vec::new();
    }
    let (min, max) = (summary.min, summary.max);
    let range = max - min;
    if range <= 0.0 {
        return vec![Bucket {
            start: min,
            end: max,
            count: subset.len(),
        }];
    }

    // Spans wider than f64::MAX are binned at half scale.
    let scale = if range.is_finite() { 1.0 } else { 0.5 };
    let lo = min * scale;
    let width = (max * scale - lo) / nbins as f64;
    let mut buckets: Vec<Bucket> = (0..nbins)
        .map(|i| Bucket {
            start: if i == 0 {
                min
            } else {
                (lo + width * i as f64) / scale
            },
            end: if i + 1 == nbins {
                max
            } else {
                (lo + width * (i + 1) as f64) / scale
            },
            count: 0,
        })
        .collect();

    for rec in subset {
        let idx = (((rec.val * scale - lo) / width) as usize).min(nbins - 1);
        buckets[idx].count += 1;
    }
    buckets
}

// ---------------------------------------------------------------------------
// Boxplot distributions
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of sorted values, `q` in `[0, 1]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// `val` grouped by sex, in first-seen order.
fn values_by_sex(subset: &[&Record]) -> Vec<(String, Vec<f64>)> {
    let mut order: Vec<(String, Vec<f64>)> = Vec::new();
    for rec in subset {
        match order.iter_mut().find(|(sex, _)| *sex == rec.sex_name) {
            Some((_, values)) => values.push(rec.val),
            None => order.push((rec.sex_name.clone(), vec![rec.val])),
        }
    }
    order
}

/// Per-sex distribution of `val` for the boxplot, in first-seen order.
pub fn sex_distributions(subset: &[&Record]) -> Vec<(String, BoxSummary)> {
    values_by_sex(subset)
        .into_iter()
        .filter_map(|(sex, values)| BoxSummary::from_values(&values).map(|b| (sex, b)))
        .collect()
}

// ---------------------------------------------------------------------------
// Key statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of one group, as shown in the key statistics table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single observation.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Describe {
    /// `None` for an empty slice. Quartiles interpolate like [`BoxSummary`].
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (&min, &max) = (
            values.iter().min_by(|a, b| a.total_cmp(b))?,
            values.iter().max_by(|a, b| a.total_cmp(b))?,
        );
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min,
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max,
        })
    }
}

/// Key statistics of `val` per sex, in first-seen order.
pub fn describe_by_sex(subset: &[&Record]) -> Vec<(String, Describe)> {
    values_by_sex(subset)
        .into_iter()
        .filter_map(|(sex, values)| Describe::from_values(&values).map(|d| (sex, d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> Vec<Record> {
        vec![
            Record::new("A", "Male", 2000, 30.0),
            Record::new("A", "Female", 2000, 40.0),
            Record::new("B", "Male", 2000, 50.0),
        ]
    }

    fn refs(records: &[Record]) -> Vec<&Record> {
        records.iter().collect()
    }

    #[test]
    fn scenario_overall_summary() {
        let rows = table();
        let summary = overall_summary(&refs(&rows)).unwrap();
        assert_eq!(summary.mean, 40.0);
        assert_eq!(summary.min, 30.0);
        assert_eq!(summary.max, 50.0);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn scenario_by_sex_in_first_seen_order() {
        let rows = table();
        assert_eq!(
            by_sex(&refs(&rows)),
            vec![("Male".to_string(), 40.0), ("Female".to_string(), 40.0)]
        );
    }

    #[test]
    fn scenario_ranked_by_location() {
        let rows = table();
        assert_eq!(
            ranked_by_location(&refs(&rows), DEFAULT_TOP_N),
            vec![("B".to_string(), 50.0), ("A".to_string(), 35.0)]
        );
    }

    #[test]
    fn ranking_breaks_ties_alphabetically_and_truncates() {
        let rows = vec![
            Record::new("Zambia", "Both", 2000, 40.0),
            Record::new("Austria", "Both", 2000, 40.0),
            Record::new("Mali", "Both", 2000, 20.0),
        ];
        let ranked = ranked_by_location(&refs(&rows), 2);
        assert_eq!(
            ranked,
            vec![("Austria".to_string(), 40.0), ("Zambia".to_string(), 40.0)]
        );
    }

    #[test]
    fn year_and_sex_groups_sorted_by_year_then_sex() {
        let rows = vec![
            Record::new("A", "Male", 2001, 10.0),
            Record::new("A", "Female", 2000, 20.0),
            Record::new("B", "Male", 2000, 30.0),
            Record::new("B", "Male", 2000, 50.0),
        ];
        assert_eq!(
            by_year_and_sex(&refs(&rows)),
            vec![
                (2000, "Female".to_string(), 20.0),
                (2000, "Male".to_string(), 40.0),
                (2001, "Male".to_string(), 10.0),
            ]
        );
        assert_eq!(by_year(&refs(&rows)), vec![(2000, 100.0 / 3.0), (2001, 10.0)]);
    }

    #[test]
    fn empty_subset_yields_empty_results() {
        let empty: Vec<&Record> = Vec::new();
        assert!(overall_summary(&empty).is_none());
        assert!(by_sex(&empty).is_empty());
        assert!(by_location(&empty).is_empty());
        assert!(ranked_by_location(&empty, DEFAULT_TOP_N).is_empty());
        assert!(by_year_and_sex(&empty).is_empty());
        assert!(by_year(&empty).is_empty());
        assert!(histogram_buckets(&empty, DEFAULT_BINS).is_empty());
        assert!(sex_distributions(&empty).is_empty());
    }

    #[test]
    fn histogram_spans_min_to_max() {
        let rows: Vec<Record> = (0..=10)
            .map(|i| Record::new("A", "Both", 2000, f64::from(i)))
            .collect();
        let buckets = histogram_buckets(&refs(&rows), 5);

        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].start, 0.0);
        assert_eq!(buckets[4].end, 10.0);
        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), [2, 2, 2, 2, 3]);
    }

    #[test]
    fn histogram_of_constant_values_is_one_bucket() {
        let rows = vec![
            Record::new("A", "Male", 2000, 42.0),
            Record::new("B", "Male", 2000, 42.0),
        ];
        let buckets = histogram_buckets(&refs(&rows), DEFAULT_BINS);
        assert_eq!(
            buckets,
            vec![Bucket {
                start: 42.0,
                end: 42.0,
                count: 2
            }]
        );
    }

    #[test]
    fn histogram_of_extreme_span_keeps_finite_edges() {
        let rows = vec![
            Record::new("A", "Male", 2000, -1e308),
            Record::new("B", "Male", 2000, 0.0),
            Record::new("C", "Male", 2000, 1e308),
        ];
        let buckets = histogram_buckets(&refs(&rows), 4);

        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert!(buckets.windows(2).all(|w| w[0].end == w[1].start));
        assert_eq!(buckets[0].start, -1e308);
        assert_eq!(buckets[3].end, 1e308);
        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), [1, 0, 1, 1]);
    }

    #[test]
    fn box_summary_flags_outliers() {
        let summary = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn sex_distributions_follow_first_seen_order() {
        let rows = table();
        let dists = sex_distributions(&refs(&rows));
        let names: Vec<_> = dists.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, ["Male", "Female"]);
        assert_eq!(dists[0].1.median, 40.0);
    }

    #[test]
    fn describe_matches_sample_statistics() {
        let rows = vec![
            Record::new("A", "Male", 2000, 2.0),
            Record::new("A", "Female", 2000, 40.0),
            Record::new("B", "Male", 2000, 4.0),
            Record::new("C", "Male", 2001, 4.0),
            Record::new("D", "Male", 2001, 4.0),
            Record::new("E", "Male", 2002, 5.0),
            Record::new("F", "Male", 2002, 5.0),
            Record::new("G", "Male", 2003, 7.0),
            Record::new("H", "Male", 2003, 9.0),
        ];
        let stats = describe_by_sex(&refs(&rows));
        let names: Vec<_> = stats.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, ["Male", "Female"]);

        let male = stats[0].1;
        assert_eq!(male.count, 8);
        assert_eq!(male.mean, 5.0);
        // Squared deviations sum to 32 over 7 degrees of freedom.
        assert!((male.std.unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!((male.min, male.max), (2.0, 9.0));
        assert_eq!((male.q1, male.median, male.q3), (4.0, 4.5, 5.5));

        let female = stats[1].1;
        assert_eq!(female.count, 1);
        assert_eq!(female.std, None);
        assert_eq!((female.q1, female.median, female.q3), (40.0, 40.0, 40.0));
    }

    #[test]
    fn describe_quartiles_agree_with_box_summary() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let d = Describe::from_values(&values).unwrap();
        let b = BoxSummary::from_values(&values).unwrap();
        assert_eq!((d.q1, d.median, d.q3), (b.q1, b.median, b.q3));
        assert!(Describe::from_values(&[]).is_none());
        assert!(describe_by_sex(&[]).is_empty());
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        let record = (
            prop::sample::select(vec!["A", "B", "C", "D"]),
            prop::sample::select(vec!["Male", "Female", "Both"]),
            1990..1995i32,
            10.0..90.0f64,
        )
            .prop_map(|(loc, sex, year, val)| Record::new(loc, sex, year, val));
        prop::collection::vec(record, 0..60)
    }

    proptest! {
        #[test]
        fn ranked_is_bounded_and_non_increasing(rows in arb_records(), limit in 0usize..6) {
            let ranked = ranked_by_location(&refs(&rows), limit);
            prop_assert!(ranked.len() <= limit);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }
        }

        #[test]
        fn by_sex_matches_brute_force_mean(rows in arb_records()) {
            for (sex, mean) in by_sex(&refs(&rows)) {
                let vals: Vec<f64> = rows
                    .iter()
                    .filter(|r| r.sex_name == sex)
                    .map(|r| r.val)
                    .collect();
                #[allow(clippy::cast_precision_loss)]
                let expected = vals.iter().sum::<f64>() / vals.len() as f64;
                prop_assert!((mean - expected).abs() < 1e-9);
            }
        }

        #[test]
        fn histogram_counts_every_value(rows in arb_records(), nbins in 1usize..30) {
            let total: usize = histogram_buckets(&refs(&rows), nbins)
                .iter()
                .map(|b| b.count)
                .sum();
            prop_assert_eq!(total, rows.len());
        }
    }
}
