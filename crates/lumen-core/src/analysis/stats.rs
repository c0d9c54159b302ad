//! Numeric utilities shared by all analyzers
//!
//! Every function guards its own division: an empty slice, a single point,
//! or a zero denominator yields "insufficient data" rather than NaN.

/// Points at least this many standard deviations from the mean are anomalies
pub const ANOMALY_SIGMA: f64 = 2.0;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty slice
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Indices of points whose distance from the mean reaches `ANOMALY_SIGMA`
/// standard deviations
///
/// A flat series (zero deviation) has no anomalies.
pub fn detect_anomalies(values: &[f64]) -> Vec<usize> {
    let (Some(mean), Some(sd)) = (mean(values), std_dev(values)) else {
        return Vec::new();
    };

    if sd <= 0.0 || !sd.is_finite() {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| (*v - mean).abs() >= ANOMALY_SIGMA * sd)
        .map(|(i, _)| i)
        .collect()
}

/// Least-squares linear fit over x = 1..=n, evaluated at x = n + 1
///
/// Returns `None` when the regression denominator is zero (fewer than two
/// points).
pub fn forecast_next(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.is_empty() {
        return None;
    }

    let xs = (1..=values.len()).map(|i| i as f64);
    let sum_x: f64 = xs.clone().sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = xs.clone().zip(values).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.map(|x| x * x).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(slope * (n + 1.0) + intercept)
}

/// Percent change from `previous` to `current`, `None` when previous is zero
pub fn growth_rate(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_linear_series() {
        let forecast = forecast_next(&[100.0, 200.0, 300.0, 400.0]).unwrap();
        assert!((forecast - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_flat_series() {
        let forecast = forecast_next(&[42.0, 42.0, 42.0]).unwrap();
        assert!((forecast - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_insufficient_data() {
        assert_eq!(forecast_next(&[]), None);
        assert_eq!(forecast_next(&[100.0]), None);
    }

    #[test]
    fn test_anomaly_single_spike() {
        let values = [10.0, 10.0, 10.0, 10.0, 100.0];
        assert_eq!(detect_anomalies(&values), vec![4]);
    }

    #[test]
    fn test_anomaly_flat_and_empty() {
        assert!(detect_anomalies(&[]).is_empty());
        assert!(detect_anomalies(&[5.0, 5.0, 5.0]).is_empty());
    }

    #[test]
    fn test_anomaly_none_in_steady_growth() {
        let values = [185_000.0, 198_000.0, 215_000.0, 232_000.0, 248_000.0, 267_000.0];
        assert!(detect_anomalies(&values).is_empty());
    }

    #[test]
    fn test_mean_and_std_dev() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some(2.0));
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(110.0, 100.0), Some(10.0));
        assert_eq!(growth_rate(5.0, 0.0), None);
    }
}
