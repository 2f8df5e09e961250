use thiserror::Error;

/// Minimum number of distinct years needed to fit a trend.
pub const MIN_POINTS: usize = 3;
/// Longest projection the command line accepts, in years.
pub const MAX_HORIZON: u32 = 100;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    #[error("need at least {MIN_POINTS} years of data to forecast, got {0}")]
    TooFewPoints(usize),
    #[error("trend fit did not converge")]
    Degenerate,
}

/// Projected yearly means past the last observed year.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub slope: f64,
    pub intercept: f64,
    /// `(year, projected mean)` for each forecast year, ascending.
    pub points: Vec<(i32, f64)>,
}

/// Naive drift forecast: fit a least-squares line through the yearly means and
/// extend it `horizon` years past the last observation.
pub fn forecast(series: &[(i32, f64)], horizon: u32) -> Result<Forecast, ForecastError> {
    if series.len() < MIN_POINTS {
        return Err(ForecastError::TooFewPoints(series.len()));
    }

    #[allow(clippy::cast_precision_loss)]
    let n = series.len() as f64;
    let mean_x = series.iter().map(|&(x, _)| f64::from(x)).sum::<f64>() / n;
    let mean_y = series.iter().map(|&(_, y)| y).sum::<f64>() / n;
    let (mut num, mut denom) = (0.0, 0.0);
    for &(x, y) in series {
        let dx = f64::from(x) - mean_x;
        num += dx * (y - mean_y);
        denom += dx * dx;
    }
    if denom == 0.0 {
        return Err(ForecastError::Degenerate);
    }
    let slope = num / denom;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ForecastError::Degenerate);
    }

    let last_year = series.iter().map(|&(x, _)| x).max().unwrap_or_default();
    let points = (1..=horizon)
        .map_while(|step| i32::try_from(step).ok().and_then(|s| last_year.checked_add(s)))
        .map(|year| (year, intercept + slope * f64::from(year)))
        .collect();

    Ok(Forecast {
        slope,
        intercept,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extends_a_linear_series() {
        let series = [(2000, 30.0), (2001, 31.0), (2002, 32.0)];
        let fc = forecast(&series, 2).unwrap();

        assert!((fc.slope - 1.0).abs() < 1e-9);
        assert_eq!(fc.points.len(), 2);
        assert_eq!(fc.points[0].0, 2003);
        assert!((fc.points[0].1 - 33.0).abs() < 1e-9);
        assert!((fc.points[1].1 - 34.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_forecasts_flat() {
        let series = [(1990, 40.0), (1995, 40.0), (2000, 40.0)];
        let fc = forecast(&series, 1).unwrap();
        assert!(fc.slope.abs() < 1e-12);
        assert_eq!(fc.points, vec![(2001, 40.0)]);
    }

    #[test]
    fn too_few_points_is_an_error() {
        assert_eq!(
            forecast(&[(2000, 1.0), (2001, 2.0)], 3),
            Err(ForecastError::TooFewPoints(2))
        );
        assert_eq!(forecast(&[], 3), Err(ForecastError::TooFewPoints(0)));
    }

    #[test]
    fn identical_years_do_not_converge() {
        let series = [(2000, 1.0), (2000, 2.0), (2000, 3.0)];
        assert_eq!(forecast(&series, 3), Err(ForecastError::Degenerate));
    }

    #[test]
    fn projection_stops_at_the_last_representable_year() {
        let series = [
            (i32::MAX - 2, 40.0),
            (i32::MAX - 1, 41.0),
            (i32::MAX, 42.0),
        ];
        let fc = forecast(&series, 1).unwrap();
        assert!(fc.points.is_empty());

        let series = [(2018, 40.0), (2019, 41.0), (i32::MAX - 1, 42.0)];
        let fc = forecast(&series, 5).unwrap();
        assert_eq!(fc.points.len(), 1);
        assert_eq!(fc.points[0].0, i32::MAX);
    }

    #[test]
    fn non_finite_values_do_not_converge() {
        let series = [(2000, 1.0), (2001, f64::NAN), (2002, 3.0)];
        assert_eq!(forecast(&series, 3), Err(ForecastError::Degenerate));
    }
}
