//! Field statistics and regression utilities.
//!
//! Summary statistics over a grid's values (missing samples excluded),
//! cosine-latitude weighting for area-representative means, simple linear
//! regression and mean-difference errorbars with significance checks, and
//! empirical bootstrap confidence intervals.

use geom_common::{GeomError, GeomResult};
use rand::Rng;

use crate::grid::Grid;

/// Summary statistics for a grid field.
///
/// NaN samples count as missing; every other statistic is computed over
/// the analyzed (finite) samples only.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStats {
    pub n_elements: usize,
    pub n_analyzed: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Sample standard deviation (ddof = 1).
    pub stddev: f64,
    pub mean_abs: f64,
    /// Smallest nonzero magnitude, NaN when every sample is zero.
    pub min_abs: f64,
    pub frac_zero: f64,
    pub frac_missing: f64,
}

impl FieldStats {
    /// Compute summary statistics over a grid's values.
    ///
    /// Fails with `MalformedGrid` when no finite sample exists.
    pub fn compute(grid: &Grid) -> GeomResult<FieldStats> {
        let values = grid.values();
        let n_elements = values.len();

        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n_analyzed = finite.len();
        if n_analyzed == 0 {
            return Err(GeomError::malformed_grid("no finite samples to analyze"));
        }

        let mean = finite.iter().sum::<f64>() / n_analyzed as f64;
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        let mut sum_abs = 0.0;
        let mut min_abs = f64::INFINITY;
        let mut n_zero = 0usize;
        for &v in &finite {
            min = min.min(v);
            max = max.max(v);
            sum_abs += v.abs();
            if v == 0.0 {
                n_zero += 1;
            } else {
                min_abs = min_abs.min(v.abs());
            }
        }

        let variance = if n_analyzed > 1 {
            finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n_analyzed - 1) as f64
        } else {
            0.0
        };

        finite.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = median_of_sorted(&finite);

        Ok(FieldStats {
            n_elements,
            n_analyzed,
            mean,
            min,
            max,
            median,
            stddev: variance.sqrt(),
            mean_abs: sum_abs / n_analyzed as f64,
            min_abs: if min_abs.is_finite() { min_abs } else { f64::NAN },
            frac_zero: n_zero as f64 / n_analyzed as f64,
            frac_missing: (n_elements - n_analyzed) as f64 / n_elements as f64,
        })
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Cosine weights for latitudes in degrees.
///
/// Grid rows cover shrinking surface area toward the poles; weighting by
/// the cosine of latitude makes spatial means area-representative.
pub fn latitude_weights(lats: &[f64]) -> Vec<f64> {
    lats.iter()
        .map(|lat| (lat * std::f64::consts::PI / 180.0).cos())
        .collect()
}

/// Weighted mean of `data` with per-sample `weights`.
pub fn weighted_mean(data: &[f64], weights: &[f64]) -> GeomResult<f64> {
    if data.len() != weights.len() {
        return Err(GeomError::malformed_grid(format!(
            "data and weights length mismatch: {} vs {}",
            data.len(),
            weights.len()
        )));
    }
    let wsum: f64 = weights.iter().sum();
    if wsum == 0.0 {
        return Err(GeomError::malformed_grid("weights sum to zero"));
    }
    let num: f64 = data.iter().zip(weights).map(|(d, w)| d * w).sum();
    Ok(num / wsum)
}

/// Least-squares linear fit of `y` against `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit.
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares regression of `y` on `x`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> GeomResult<LinearFit> {
    if x.len() != y.len() {
        return Err(GeomError::malformed_grid(
            "samples x and y are not of the same size",
        ));
    }
    let n = x.len();
    if n < 2 {
        return Err(GeomError::malformed_grid(
            "regression needs at least two samples",
        ));
    }

    let xm = x.iter().sum::<f64>() / n as f64;
    let ym = y.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sxx += (xi - xm) * (xi - xm);
        syy += (yi - ym) * (yi - ym);
        sxy += (xi - xm) * (yi - ym);
    }
    if sxx == 0.0 {
        return Err(GeomError::malformed_grid("x samples are all identical"));
    }

    let slope = sxy / sxx;
    let intercept = ym - slope * xm;
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Regression coefficient with standard error and a significance flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub coefficient: f64,
    pub std_error: f64,
    /// Whether the coefficient exceeds its error bar at the requested
    /// confidence level.
    pub significant: bool,
}

/// Regression coefficient of `y` on `x` with its standard error and a
/// two-sided significance test at `confidence` percent.
pub fn lregress(x: &[f64], y: &[f64], confidence: f64) -> GeomResult<Regression> {
    if x.len() != y.len() {
        return Err(GeomError::malformed_grid(
            "samples x and y are not of the same size",
        ));
    }
    let n = x.len();
    if n < 3 {
        return Err(GeomError::malformed_grid(
            "significance test needs at least three samples",
        ));
    }

    let fit = linear_regression(x, y)?;

    let xm = x.iter().sum::<f64>() / n as f64;
    let ym = y.iter().sum::<f64>() / n as f64;
    let cov_xx = x.iter().map(|xi| (xi - xm).powi(2)).sum::<f64>() / (n - 1) as f64;
    let cov_yy = y.iter().map(|yi| (yi - ym).powi(2)).sum::<f64>() / (n - 1) as f64;

    let rc = fit.slope;
    // Residual variance of the fit, then the error on the coefficient
    let se = (cov_yy - rc * rc * cov_xx) * (n - 1) as f64 / (n - 2) as f64;
    let sb = (se.max(0.0) / (cov_xx * (n - 1) as f64)).sqrt();

    let pval = 1.0 - (1.0 - confidence / 100.0) / 2.0;
    let crit = normal_quantile(pval);
    let significant = rc.abs() - (crit * sb).abs() > 0.0;

    Ok(Regression {
        coefficient: rc,
        std_error: sb,
        significant,
    })
}

/// Difference in sample means with its two-sided errorbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanDifference {
    /// Mean of the experiment minus mean of the control.
    pub difference: f64,
    /// Critical value times the standard error of the difference.
    pub errorbar: f64,
}

impl MeanDifference {
    /// Whether the difference exceeds its errorbar.
    pub fn significant(&self) -> bool {
        self.difference.abs() - self.errorbar.abs() > 0.0
    }
}

/// Mean difference between an `experiment` and a `control` sample with
/// its errorbar at `confidence` percent.
///
/// Paired mode uses the spread of element-wise differences; unpaired
/// mode pools the two sample variances. With `scale`, both outputs are
/// rescaled to a percentage of the control mean.
pub fn mean_difference(
    control: &[f64],
    experiment: &[f64],
    confidence: f64,
    paired: bool,
    scale: bool,
) -> GeomResult<MeanDifference> {
    if control.len() != experiment.len() {
        return Err(GeomError::malformed_grid(
            "control and experiment samples are not of the same size",
        ));
    }
    let n = control.len();
    if n < 2 {
        return Err(GeomError::malformed_grid(
            "mean difference needs at least two samples",
        ));
    }

    let xmean = control.iter().sum::<f64>() / n as f64;
    let ymean = experiment.iter().sum::<f64>() / n as f64;
    let mut difference = ymean - xmean;

    let std_err = if paired {
        let dmean = difference;
        let dvar = control
            .iter()
            .zip(experiment)
            .map(|(x, y)| ((y - x) - dmean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        (dvar / n as f64).sqrt()
    } else {
        let xvar = control.iter().map(|x| (x - xmean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let yvar = experiment.iter().map(|y| (y - ymean).powi(2)).sum::<f64>() / (n - 1) as f64;
        ((xvar + yvar) / (n - 1) as f64).sqrt()
    };

    let pval = 1.0 - (1.0 - confidence / 100.0) / 2.0;
    let mut errorbar = normal_quantile(pval) * std_err;

    if scale {
        if xmean == 0.0 {
            return Err(GeomError::malformed_grid(
                "cannot rescale against a zero control mean",
            ));
        }
        let factor = 100.0 / xmean;
        difference *= factor;
        errorbar *= factor;
    }

    Ok(MeanDifference {
        difference,
        errorbar,
    })
}

/// Empirical bootstrap confidence interval on an estimator's deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimator {
    Mean,
    Median,
}

/// Lower and upper bounds of the bootstrap confidence interval for the
/// chosen estimator, at confidence `level` (0..1), from `n_replicates`
/// resamples. NaN samples are dropped before resampling.
pub fn bootstrap_ci(
    sample: &[f64],
    level: f64,
    estimator: Estimator,
    n_replicates: usize,
) -> GeomResult<(f64, f64)> {
    let clean: Vec<f64> = sample.iter().copied().filter(|v| !v.is_nan()).collect();
    if clean.is_empty() {
        return Err(GeomError::malformed_grid("no finite samples to resample"));
    }
    if clean.len() < sample.len() {
        tracing::debug!(
            dropped = sample.len() - clean.len(),
            "dropping NaN samples before bootstrap"
        );
    }

    let estimate = |values: &mut Vec<f64>| -> f64 {
        match estimator {
            Estimator::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Estimator::Median => {
                values.sort_by(|a, b| a.partial_cmp(b).unwrap());
                median_of_sorted(values)
            }
        }
    };

    let point = estimate(&mut clean.clone());

    let mut rng = rand::thread_rng();
    let mut deltas = Vec::with_capacity(n_replicates);
    let mut resample = vec![0.0; clean.len()];
    for _ in 0..n_replicates {
        for slot in resample.iter_mut() {
            *slot = clean[rng.gen_range(0..clean.len())];
        }
        deltas.push(estimate(&mut resample) - point);
    }
    deltas.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let lower_pct = (1.0 - level) / 2.0 * 100.0;
    let upper_pct = 100.0 - lower_pct;
    Ok((
        percentile(&deltas, lower_pct),
        percentile(&deltas, upper_pct),
    ))
}

/// Linear-interpolated percentile of a sorted slice, `p` in 0..100.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi.min(n - 1)] - sorted[lo])
}

/// Inverse standard normal CDF (Acklam's rational approximation).
///
/// Accurate to about 1e-9 over (0, 1), which is far tighter than the
/// sampling noise of any significance test built on it.
fn normal_quantile(p: f64) -> f64 {
    debug_assert!(p > 0.0 && p < 1.0);

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridCoords;

    fn grid_from(values: Vec<f64>, nx: usize, ny: usize) -> Grid {
        let xs: Vec<f64> = (0..nx).map(|i| i as f64).collect();
        let ys: Vec<f64> = (0..ny).map(|j| j as f64).collect();
        Grid::new(values, nx, ny, GridCoords::Rectilinear { xs, ys }, None).unwrap()
    }

    #[test]
    fn test_field_stats_basic() {
        let grid = grid_from(vec![1.0, 2.0, 3.0, 4.0, 0.0, f64::NAN], 3, 2);
        let stats = FieldStats::compute(&grid).unwrap();

        assert_eq!(stats.n_elements, 6);
        assert_eq!(stats.n_analyzed, 5);
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.median - 2.0).abs() < 1e-12);
        assert!((stats.min_abs - 1.0).abs() < 1e-12);
        assert!((stats.frac_zero - 0.2).abs() < 1e-12);
        assert!((stats.frac_missing - 1.0 / 6.0).abs() < 1e-12);
        // sample stddev of [1,2,3,4,0] is sqrt(2.5)
        assert!((stats.stddev - 2.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_field_stats_all_nan_fails() {
        let grid = grid_from(vec![f64::NAN; 4], 2, 2);
        let err = FieldStats::compute(&grid).unwrap_err();
        assert!(matches!(err, GeomError::MalformedGrid(_)));
    }

    #[test]
    fn test_latitude_weights() {
        let w = latitude_weights(&[0.0, 60.0, 90.0]);
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!((w[1] - 0.5).abs() < 1e-12);
        assert!(w[2].abs() < 1e-12);
    }

    #[test]
    fn test_weighted_mean() {
        let mean = weighted_mean(&[10.0, 20.0], &[3.0, 1.0]).unwrap();
        assert!((mean - 12.5).abs() < 1e-12);

        assert!(weighted_mean(&[1.0], &[1.0, 2.0]).is_err());
        assert!(weighted_mean(&[1.0, 2.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_linear_regression_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = linear_regression(&x, &y).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_lregress_strong_signal_is_significant() {
        let x: Vec<f64> = (0..50).map(|k| k as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 2.0 * v + ((v * 7.0).sin())).collect();
        let reg = lregress(&x, &y, 95.0).unwrap();

        assert!((reg.coefficient - 2.0).abs() < 0.05);
        assert!(reg.significant);
    }

    #[test]
    fn test_lregress_noise_is_not_significant() {
        // Zero-slope data with symmetric wobble around a constant
        let x: Vec<f64> = (0..20).map(|k| k as f64).collect();
        let y: Vec<f64> = (0..20).map(|k| if k % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let reg = lregress(&x, &y, 95.0).unwrap();

        assert!(reg.coefficient.abs() < 0.1);
        assert!(!reg.significant);
    }

    #[test]
    fn test_mean_difference_paired_detects_shift() {
        // A constant offset buried under the control's own spread: the
        // paired test sees it, the unpaired test does not
        let control: Vec<f64> = (0..10).map(|k| k as f64).collect();
        let experiment: Vec<f64> = control
            .iter()
            .enumerate()
            .map(|(k, &v)| v + 2.0 + if k % 2 == 0 { 0.1 } else { -0.1 })
            .collect();

        let paired = mean_difference(&control, &experiment, 95.0, true, false).unwrap();
        assert!((paired.difference - 2.0).abs() < 1e-12);
        assert!(paired.significant());

        let unpaired = mean_difference(&control, &experiment, 95.0, false, false).unwrap();
        assert!((unpaired.difference - 2.0).abs() < 1e-12);
        assert!(!unpaired.significant());
    }

    #[test]
    fn test_mean_difference_unpaired_errorbar() {
        let control = [1.0, 2.0, 3.0, 4.0];
        let experiment = [3.0, 4.0, 5.0, 6.0];
        let md = mean_difference(&control, &experiment, 95.0, false, false).unwrap();

        // pooled variance 10/3, std error sqrt(10)/3, times z(0.975)
        assert!((md.difference - 2.0).abs() < 1e-12);
        assert!((md.errorbar - 1.959964 * 10.0_f64.sqrt() / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_mean_difference_scaled_to_percent() {
        let control = [1.0, 2.0, 3.0, 4.0];
        let experiment = [3.0, 4.0, 5.0, 6.0];
        let md = mean_difference(&control, &experiment, 95.0, true, true).unwrap();

        // shift of 2 against a control mean of 2.5 is 80 percent
        assert!((md.difference - 80.0).abs() < 1e-12);
        assert!(md.errorbar.abs() < 1e-12);
        assert!(md.significant());
    }

    #[test]
    fn test_mean_difference_rejects_bad_input() {
        assert!(mean_difference(&[1.0, 2.0], &[1.0], 95.0, true, false).is_err());
        assert!(mean_difference(&[1.0], &[1.0], 95.0, true, false).is_err());
        assert!(mean_difference(&[-1.0, 1.0], &[0.0, 2.0], 95.0, true, true).is_err());
    }

    #[test]
    fn test_normal_quantile_known_values() {
        assert!(normal_quantile(0.5).abs() < 1e-9);
        assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-4);
        assert!((normal_quantile(0.025) + 1.959964).abs() < 1e-4);
    }

    #[test]
    fn test_bootstrap_ci_brackets_zero() {
        let sample: Vec<f64> = (0..200).map(|k| (k % 10) as f64).collect();
        let (lo, hi) = bootstrap_ci(&sample, 0.95, Estimator::Mean, 500).unwrap();

        // Deltas are deviations from the sample mean, so the interval
        // straddles zero and is narrow for a large sample
        assert!(lo < 0.0 && hi > 0.0);
        assert!(hi - lo < 2.0);
    }

    #[test]
    fn test_bootstrap_drops_nan() {
        let sample = [1.0, 2.0, f64::NAN, 3.0];
        assert!(bootstrap_ci(&sample, 0.95, Estimator::Median, 100).is_ok());
        assert!(bootstrap_ci(&[f64::NAN], 0.95, Estimator::Mean, 10).is_err());
    }
}
