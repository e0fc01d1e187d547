//! Calculate the over-representation of gene sets in a query gene list and
//! the probability of the overlap within the hypergeometric distribution.
//!
//! These methods are useful when you have a list of genes of interest, e.g.
//! from a differential expression experiment, and want to see which curated
//! gene sets contain more of them than expected by chance.
//!
//! The test is one-sided: it only scores over-representation, never
//! depletion.
//!
//! # Examples
//!
//! ```
//! use ora::stats::hypergeom::set_enrichment;
//! use ora::{GeneSet, GeneSetLibrary};
//!
//! let query = GeneSet::from_iter(["BRCA1", "BRCA2", "ATM", "CHEK2"]);
//!
//! let mut library = GeneSetLibrary::new();
//! library.insert("dsb repair", ["BRCA1", "BRCA2", "RAD51", "ATM"]);
//! library.insert("glycolysis", ["HK1", "PFKM", "PKM"]);
//!
//! let mut enrichments = set_enrichment(&query, &library, None).unwrap();
//!
//! // the results are in set-name order, not sorted by p-value
//! enrichments.sort_by(|a, b| {
//!     a.pvalue()
//!         .partial_cmp(&b.pvalue())
//!         .expect("nan must not appear as pvalue")
//! });
//!
//! for enrichment in enrichments {
//!     println!(
//!         "{}\t{:e}\t({})",
//!         enrichment.name(),
//!         enrichment.pvalue(),
//!         enrichment.fold_enrichment()
//!     );
//! }
//! ```

use statrs::distribution::{DiscreteCDF, Hypergeometric};
use tracing::debug;

use crate::set::{GeneSet, GeneSetLibrary};
use crate::stats::{f64_from_u64, Enrichment};
use crate::{OraError, OraResult, DEFAULT_BACKGROUND_SIZE};

/// Calculates the hypergeometric enrichment of every gene set of the
/// `library` within the `query`
///
/// Returns one [`Enrichment`] per gene set, in lexicographic set-name order.
/// The number of draws is the query size, the number of successes in the
/// population is the gene set size, and the population is `background`
/// (defaulting to [`DEFAULT_BACKGROUND_SIZE`] when `None`).
///
/// Gene sets without any overlap are scored with a p-value of `1.0`; this
/// includes empty member sets and an empty query.
///
/// # Errors
///
/// - [`OraError::EmptyLibrary`] if the library contains no gene sets
/// - [`OraError::InvalidBackgroundSize`] if `background` is `0`
/// - [`OraError::BackgroundTooSmall`] if an overlapping gene set or the
///   query is larger than the background population
///
/// # Examples
///
/// ```
/// use ora::stats::hypergeom::set_enrichment;
/// use ora::{GeneSet, GeneSetLibrary};
///
/// let query = GeneSet::from_iter(["A", "B", "C"]);
/// let mut library = GeneSetLibrary::new();
/// library.insert("cat1", ["A", "B", "X", "Y"]);
///
/// let enrichments = set_enrichment(&query, &library, Some(20_000)).unwrap();
/// assert_eq!(enrichments[0].count(), 2);
/// assert_eq!(enrichments[0].set_size(), 4);
/// assert!(enrichments[0].pvalue() < 1e-7);
/// ```
pub fn set_enrichment(
    query: &GeneSet,
    library: &GeneSetLibrary,
    background: Option<u64>,
) -> OraResult<Vec<Enrichment>> {
    let background = background.unwrap_or(DEFAULT_BACKGROUND_SIZE);
    if background == 0 {
        return Err(OraError::InvalidBackgroundSize(background));
    }
    if library.is_empty() {
        return Err(OraError::EmptyLibrary);
    }

    // the number of draws is fixed across all gene sets
    let draws = query.len() as u64;

    let mut res = Vec::with_capacity(library.len());
    for (name, members) in library {
        let set_size = members.len() as u64;
        let hits = query.intersect(members);
        let observed = hits.len() as u64;

        let (pvalue, fold_enrichment) = if observed == 0 {
            // without any overlap there is no enrichment signal and
            // P(X >= 0) is always 1
            (1.0, 0.0)
        } else {
            let hyper = Hypergeometric::new(background, set_size, draws).map_err(|_| {
                OraError::BackgroundTooSmall {
                    background,
                    set_size,
                    query_size: draws,
                }
            })?;
            // subtracting 1, because we want to test including observed,
            // e.g. "7 or more", but sf by default calculates "more than 7"
            let pvalue = hyper.sf(observed - 1);
            let fold_enrichment = (f64_from_u64(observed) / f64_from_u64(draws))
                / (f64_from_u64(set_size) / f64_from_u64(background));
            (pvalue, fold_enrichment)
        };

        debug!(
            "Set:{}\tPopulation: {}, Successes: {}, Draws: {}, Observed: {}",
            name, background, set_size, draws, observed
        );
        res.push(Enrichment::new(
            name.to_string(),
            pvalue,
            observed,
            set_size,
            hits,
            fold_enrichment,
        ));
    }
    Ok(res)
}
