//! Small numeric helpers shared by the scoring engine, the record builders,
//! and the dashboard. Every ratio is zero-guarded: a non-positive denominator
//! yields 0 rather than an error, matching how operators expect partial
//! batches to render.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator). 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Coefficient of variation as a percentage. 0 when the mean is non-positive.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mu = mean(values);
    if mu <= 0.0 {
        return 0.0;
    }
    100.0 * sample_std_dev(values) / mu
}

pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Percentage drop from `from` to `to`, 0 when `from` is non-positive.
pub fn pct_drop_or_zero(from: f64, to: f64) -> f64 {
    ratio_or_zero(100.0 * (from - to), from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        // Known sample: mean 5, squared deviations sum 8, sd = sqrt(8/3).
        let values = [3.0, 5.0, 5.0, 7.0];
        let expected = (8.0f64 / 3.0).sqrt();
        assert!((sample_std_dev(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn cv_round_trips_known_distribution() {
        let values = [38.0, 40.0, 42.0];
        let mu = mean(&values);
        let sigma = sample_std_dev(&values);
        let cv = coefficient_of_variation(&values);
        assert!((cv - 100.0 * sigma / mu).abs() < 1e-12);
    }

    #[test]
    fn cv_is_zero_for_non_positive_mean() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[-2.0, -4.0]), 0.0);
    }

    #[test]
    fn ratios_never_divide_by_non_positive_denominators() {
        assert_eq!(ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, -1.0), 0.0);
        assert_eq!(pct_drop_or_zero(0.0, 50.0), 0.0);
        assert!((pct_drop_or_zero(80.0, 60.0) - 25.0).abs() < 1e-12);
    }
}
