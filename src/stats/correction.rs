//! Multiple testing correction of p-values
//!
//! Running an enrichment analysis means testing hundreds or thousands of
//! gene sets at once, so the raw p-values must be adjusted for the number
//! of tests. This module implements the Bonferroni correction (family-wise
//! error rate) and the Benjamini-Hochberg step-up procedure (false
//! discovery rate).
//!
//! `NaN` entries mark tests that were excluded upstream. They keep their
//! position: the corrected output has a `NaN` q-value and a `false` reject
//! flag at the same index, and `NaN` entries never count towards the number
//! of tests.
//!
//! # Examples
//!
//! ```
//! use ora::stats::correction::{multiple_testing_correction, CorrectionMethod};
//!
//! let pvalues = [0.001, 0.2, 0.03, f64::NAN, 0.04];
//! let corrected =
//!     multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::BenjaminiHochberg);
//!
//! assert_eq!(corrected.len(), 5);
//! assert!(corrected.reject()[0]);
//! assert!(corrected.qvalues()[3].is_nan());
//! assert!(!corrected.reject()[3]);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::stats::f64_from_usize;
use crate::{OraError, OraResult};

/// Selects how p-values are adjusted for multiple testing
///
/// The method can be parsed from its configuration string:
///
/// ```
/// use ora::stats::correction::CorrectionMethod;
///
/// let method: CorrectionMethod = "benjamini-hochberg".parse().unwrap();
/// assert_eq!(method, CorrectionMethod::BenjaminiHochberg);
/// assert!("holm".parse::<CorrectionMethod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMethod {
    /// Controls the family-wise error rate by multiplying each p-value
    /// with the number of tests
    Bonferroni,
    /// Controls the false discovery rate with the step-up procedure of
    /// Benjamini and Hochberg
    BenjaminiHochberg,
}

impl FromStr for CorrectionMethod {
    type Err = OraError;
    fn from_str(s: &str) -> OraResult<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "benjamini-hochberg" => Ok(CorrectionMethod::BenjaminiHochberg),
            _ => Err(OraError::UnknownCorrectionMethod(s.to_string())),
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionMethod::Bonferroni => write!(f, "bonferroni"),
            CorrectionMethod::BenjaminiHochberg => write!(f, "benjamini-hochberg"),
        }
    }
}

/// Corrected q-values and reject decisions, positionally aligned to the
/// p-values they were computed from
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    qvalues: Vec<f64>,
    reject: Vec<bool>,
}

impl Correction {
    /// Returns the corrected q-values
    ///
    /// `NaN` input positions carry a `NaN` q-value
    pub fn qvalues(&self) -> &[f64] {
        &self.qvalues
    }

    /// Returns whether the null hypothesis is rejected at each position
    ///
    /// `NaN` input positions are never rejected
    pub fn reject(&self) -> &[bool] {
        &self.reject
    }

    /// Returns the number of entries, equal to the input length
    pub fn len(&self) -> usize {
        self.qvalues.len()
    }

    /// Returns `true` if the correction was computed over an empty input
    pub fn is_empty(&self) -> bool {
        self.qvalues.is_empty()
    }

    /// Consumes the correction and returns `(qvalues, reject)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<bool>) {
        (self.qvalues, self.reject)
    }
}

/// Corrects p-values for multiple testing
///
/// `NaN` entries are excluded from the correction but keep their position
/// in the output. `alpha` is the significance threshold for the reject
/// decisions, conventionally [`crate::DEFAULT_ALPHA`].
///
/// # Examples
///
/// ```
/// use ora::stats::correction::{multiple_testing_correction, CorrectionMethod};
///
/// let corrected =
///     multiple_testing_correction(&[0.01, 0.4], 0.05, CorrectionMethod::Bonferroni);
/// assert_eq!(corrected.qvalues(), &[0.02, 0.8]);
/// assert_eq!(corrected.reject(), &[true, false]);
/// ```
pub fn multiple_testing_correction(
    pvalues: &[f64],
    alpha: f64,
    method: CorrectionMethod,
) -> Correction {
    // filter the testable entries into a dense subset, remembering where
    // each of them came from
    let (positions, dense): (Vec<usize>, Vec<f64>) = pvalues
        .iter()
        .enumerate()
        .filter(|(_, pvalue)| !pvalue.is_nan())
        .map(|(idx, pvalue)| (idx, *pvalue))
        .unzip();

    let (dense_qvalues, dense_reject) = match method {
        CorrectionMethod::Bonferroni => bonferroni(&dense, alpha),
        CorrectionMethod::BenjaminiHochberg => fdrcorrection(&dense, alpha),
    };

    debug!(
        "Correction:{}\tTests: {}, Excluded: {}, Rejected: {}",
        method,
        dense.len(),
        pvalues.len() - dense.len(),
        dense_reject.iter().filter(|r| **r).count()
    );

    // scatter the dense results back; excluded positions stay NaN/false
    let mut qvalues = vec![f64::NAN; pvalues.len()];
    let mut reject = vec![false; pvalues.len()];
    for ((slot, qvalue), rej) in positions.iter().zip(dense_qvalues).zip(dense_reject) {
        qvalues[*slot] = qvalue;
        reject[*slot] = rej;
    }
    Correction { qvalues, reject }
}

/// Bonferroni correction: `q = p * n` over the `n` testable entries
///
/// q-values above 1 are reported as-is, matching the conventional
/// formulation of the method
fn bonferroni(pvalues: &[f64], alpha: f64) -> (Vec<f64>, Vec<bool>) {
    let n = f64_from_usize(pvalues.len());
    let qvalues: Vec<f64> = pvalues.iter().map(|pvalue| pvalue * n).collect();
    let reject = qvalues.iter().map(|qvalue| *qvalue < alpha).collect();
    (qvalues, reject)
}

/// Empirical CDF factors `rank / nobs` for the ranks `1..=nobs`
fn ecdf(nobs: usize) -> Vec<f64> {
    (1..=nobs)
        .map(|rank| f64_from_usize(rank) / f64_from_usize(nobs))
        .collect()
}

/// Benjamini-Hochberg step-up FDR correction
fn fdrcorrection(pvalues: &[f64], alpha: f64) -> (Vec<f64>, Vec<bool>) {
    let n = pvalues.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| pvalues[*a].total_cmp(&pvalues[*b]));
    let sorted: Vec<f64> = order.iter().map(|idx| pvalues[*idx]).collect();

    let ecdffactor = ecdf(n);

    let mut reject_sorted: Vec<bool> = sorted
        .iter()
        .zip(&ecdffactor)
        .map(|(pvalue, factor)| *pvalue <= factor * alpha)
        .collect();
    // the step-up procedure rejects every rank below the highest rejected
    // one, even if its own comparison failed
    if let Some(rejectmax) = reject_sorted.iter().rposition(|reject| *reject) {
        for reject in &mut reject_sorted[..rejectmax] {
            *reject = true;
        }
    }

    let mut qvalues_sorted: Vec<f64> = sorted
        .iter()
        .zip(&ecdffactor)
        .map(|(pvalue, factor)| pvalue / factor)
        .collect();
    // running minimum from the highest rank down keeps the q-values
    // monotone along the sorted p-values
    let mut current_min = f64::INFINITY;
    for qvalue in qvalues_sorted.iter_mut().rev() {
        current_min = current_min.min(*qvalue);
        *qvalue = current_min;
    }
    for qvalue in &mut qvalues_sorted {
        if *qvalue > 1.0 {
            *qvalue = 1.0;
        }
    }

    // undo the sort
    let mut qvalues = vec![0.0; n];
    let mut reject = vec![false; n];
    for (sorted_idx, original_idx) in order.into_iter().enumerate() {
        qvalues[original_idx] = qvalues_sorted[sorted_idx];
        reject[original_idx] = reject_sorted[sorted_idx];
    }
    (qvalues, reject)
}

#[cfg(test)]
mod test {
    use statrs::assert_almost_eq;

    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn bonferroni_multiplies_by_test_count() {
        let pvalues = [0.01, 0.04, 0.03, 0.005];
        let corrected = multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::Bonferroni);
        assert_eq!(corrected.qvalues(), &[0.04, 0.16, 0.12, 0.02]);
        assert_eq!(corrected.reject(), &[true, false, false, true]);
    }

    #[test]
    fn bonferroni_does_not_clamp() {
        let corrected =
            multiple_testing_correction(&[0.5, 0.8], 0.05, CorrectionMethod::Bonferroni);
        assert_eq!(corrected.qvalues(), &[1.0, 1.6]);
        assert_eq!(corrected.reject(), &[false, false]);
    }

    #[test]
    fn bonferroni_counts_only_testable_entries() {
        let corrected =
            multiple_testing_correction(&[0.01, NAN, 0.02], 0.05, CorrectionMethod::Bonferroni);
        // the multiplier is 2, not 3
        assert_almost_eq!(corrected.qvalues()[0], 0.02, 1e-12);
        assert!(corrected.qvalues()[1].is_nan());
        assert_almost_eq!(corrected.qvalues()[2], 0.04, 1e-12);
        assert_eq!(corrected.reject(), &[true, false, true]);
    }

    #[test]
    fn fdr_scatters_around_excluded_tests() {
        let pvalues = [0.001, 0.2, 0.03, NAN, 0.04];
        let corrected =
            multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::BenjaminiHochberg);

        assert_eq!(corrected.len(), 5);
        // sorted testable pvalues: 0.001, 0.03, 0.04, 0.2 with rank
        // fractions 1/4 .. 4/4; only 0.001 <= 0.0125 rejects
        assert_almost_eq!(corrected.qvalues()[0], 0.004, 1e-12);
        assert_almost_eq!(corrected.qvalues()[1], 0.2, 1e-12);
        assert_almost_eq!(corrected.qvalues()[2], 0.04 / 0.75, 1e-12);
        assert!(corrected.qvalues()[3].is_nan());
        assert_almost_eq!(corrected.qvalues()[4], 0.04 / 0.75, 1e-12);
        assert_eq!(corrected.reject(), &[true, false, false, false, false]);
    }

    #[test]
    fn fdr_known_adjustments() {
        // Classic BH example
        // sorted: 0.005, 0.01, 0.03, 0.04; raw q: 0.02, 0.02, 0.04, 0.04
        let pvalues = [0.01, 0.04, 0.03, 0.005];
        let corrected =
            multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::BenjaminiHochberg);
        assert_almost_eq!(corrected.qvalues()[0], 0.02, 1e-12);
        assert_almost_eq!(corrected.qvalues()[1], 0.04, 1e-12);
        assert_almost_eq!(corrected.qvalues()[2], 0.04, 1e-12);
        assert_almost_eq!(corrected.qvalues()[3], 0.02, 1e-12);
        // every rank passes its own step-up comparison
        assert_eq!(corrected.reject(), &[true, true, true, true]);
    }

    #[test]
    fn fdr_rejections_form_a_prefix() {
        // 0.021 fails its own comparison (0.021 > 2/5 * 0.05 = 0.02) but is
        // below the highest rejected rank, so the step-up fix rejects it
        let pvalues = [0.021, 0.001, 0.029, 0.8, 0.9];
        let corrected =
            multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::BenjaminiHochberg);
        assert_eq!(corrected.reject(), &[true, true, true, false, false]);

        let mut ranked: Vec<(f64, bool)> = pvalues
            .iter()
            .copied()
            .zip(corrected.reject().iter().copied())
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        let first_accept = ranked.iter().position(|(_, reject)| !reject).unwrap();
        assert!(ranked[first_accept..].iter().all(|(_, reject)| !reject));
    }

    #[test]
    fn fdr_qvalues_are_monotone() {
        let pvalues = [0.1, 0.001, 0.05, 0.01, 0.5, 0.02];
        let corrected =
            multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::BenjaminiHochberg);

        let mut ranked: Vec<(f64, f64)> = pvalues
            .iter()
            .copied()
            .zip(corrected.qvalues().iter().copied())
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        for window in ranked.windows(2) {
            assert!(
                window[1].1 >= window[0].1,
                "qvalues not monotone: {} before {}",
                window[0].1,
                window[1].1
            );
        }
    }

    #[test]
    fn fdr_is_order_invariant() {
        let pvalues = [0.04, 0.002, 0.3, 0.019, 0.77, 0.0004];
        let permutation = [3, 0, 5, 1, 4, 2];
        let permuted: Vec<f64> = permutation.iter().map(|idx| pvalues[*idx]).collect();

        let corrected =
            multiple_testing_correction(&pvalues, 0.05, CorrectionMethod::BenjaminiHochberg);
        let corrected_permuted =
            multiple_testing_correction(&permuted, 0.05, CorrectionMethod::BenjaminiHochberg);

        for (permuted_idx, original_idx) in permutation.iter().enumerate() {
            assert_almost_eq!(
                corrected.qvalues()[*original_idx],
                corrected_permuted.qvalues()[permuted_idx],
                1e-12
            );
            assert_eq!(
                corrected.reject()[*original_idx],
                corrected_permuted.reject()[permuted_idx]
            );
        }
    }

    #[test]
    fn fdr_clamps_qvalues_to_one() {
        let corrected =
            multiple_testing_correction(&[0.9, 0.95, 0.99], 0.05, CorrectionMethod::BenjaminiHochberg);
        for qvalue in corrected.qvalues() {
            assert!(*qvalue <= 1.0);
        }
    }

    #[test]
    fn handles_empty_input() {
        for method in [CorrectionMethod::Bonferroni, CorrectionMethod::BenjaminiHochberg] {
            let corrected = multiple_testing_correction(&[], 0.05, method);
            assert!(corrected.is_empty());
        }
    }

    #[test]
    fn handles_all_excluded_input() {
        for method in [CorrectionMethod::Bonferroni, CorrectionMethod::BenjaminiHochberg] {
            let corrected = multiple_testing_correction(&[NAN, NAN], 0.05, method);
            assert_eq!(corrected.len(), 2);
            assert!(corrected.qvalues().iter().all(|qvalue| qvalue.is_nan()));
            assert_eq!(corrected.reject(), &[false, false]);
        }
    }

    #[test]
    fn single_pvalue_is_unchanged() {
        let corrected =
            multiple_testing_correction(&[0.04], 0.05, CorrectionMethod::BenjaminiHochberg);
        assert_almost_eq!(corrected.qvalues()[0], 0.04, 1e-12);
        assert_eq!(corrected.reject(), &[true]);
    }

    #[test]
    fn parses_method_strings() {
        assert_eq!(
            "bonferroni".parse::<CorrectionMethod>().unwrap(),
            CorrectionMethod::Bonferroni
        );
        assert_eq!(
            "Benjamini-Hochberg".parse::<CorrectionMethod>().unwrap(),
            CorrectionMethod::BenjaminiHochberg
        );
        assert_eq!(
            "benjamini_hochberg".parse::<CorrectionMethod>().unwrap(),
            CorrectionMethod::BenjaminiHochberg
        );
    }

    #[test]
    fn unknown_method_is_an_error() {
        let err = "holm".parse::<CorrectionMethod>().unwrap_err();
        assert!(matches!(err, OraError::UnknownCorrectionMethod(name) if name == "holm"));
    }

    #[test]
    fn method_display_roundtrips() {
        for method in [CorrectionMethod::Bonferroni, CorrectionMethod::BenjaminiHochberg] {
            assert_eq!(
                method.to_string().parse::<CorrectionMethod>().unwrap(),
                method
            );
        }
    }
}
