// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Welch's t-test and Benjamini-Hochberg FDR correction over per-bin density
//! rows.

use anyhow::Result;
use ordered_float::NotNan;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::density::DensityRow;

/// Two-sample t-test with unequal variances (Welch's t-test).
///
/// Returns the test statistic and the two-sided p-value. The p-value is NaN
/// if the test is undefined, e.g. when both samples have zero variance.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> (f64, f64) {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let var1 = a.variance();
    let var2 = b.variance();

    let sq_standard_error = var1 / n1 + var2 / n2;
    let t = (a.mean() - b.mean()) / sq_standard_error.sqrt();

    // Welch-Satterthwaite degrees of freedom
    let df = sq_standard_error.powi(2)
        / ((var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0));

    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * dist.cdf(-t.abs()),
        Err(_) => f64::NAN,
    };

    (t, p_value)
}

/// Per-row p-values for the full-length vs. TMD comparison. Undefined test
/// results are coerced to 1.0 (no significance).
pub fn collect_p_values(rows: &[DensityRow]) -> Vec<f64> {
    rows.iter()
        .map(|row| {
            let (_, p_value) = welch_t_test(&row.full_length, &row.tmd);
            if p_value.is_nan() {
                1.0
            } else {
                p_value
            }
        })
        .collect()
}

/// Benjamini-Hochberg adjusted p-values (step-up FDR control), returned in
/// the order of the given raw p-values.
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>> {
    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    let keys = p_values
        .iter()
        .map(|&p| NotNan::new(p))
        .collect::<Result<Vec<_>, _>>()?;
    order.sort_by_key(|&i| keys[i]);

    let mut adjusted = vec![0.0; m];
    let mut running_min = 1.0;
    for rank in (0..m).rev() {
        let i = order[rank];
        // p * m / k for rank k, monotonized from the largest rank down
        let raw = (p_values[i] * m as f64 / (rank + 1) as f64).min(1.0);
        running_min = f64::min(running_min, raw);
        adjusted[i] = running_min;
    }

    Ok(adjusted)
}
