//! Statistical scoring of gene set over-representation
//!
//! This module contains the two numeric stages of an enrichment analysis:
//! the hypergeometric scoring of every gene set against a query
//! ([`hypergeom`]) and the correction of the resulting p-values for
//! multiple hypothesis testing ([`correction`]).
//!
//! Both stages are pure functions without shared state, so they can be
//! called concurrently on different inputs without synchronization.

use crate::set::GeneSet;

pub mod correction;
pub mod hypergeom;

/// The over-representation scoring result for a single gene set
///
/// [`Enrichment`] values are returned by [`hypergeom::set_enrichment`], one
/// per gene set, in lexicographic set-name order.
#[derive(Debug, Clone)]
pub struct Enrichment {
    name: String,
    pvalue: f64,
    count: u64,
    set_size: u64,
    hits: GeneSet,
    fold_enrichment: f64,
}

impl Enrichment {
    pub(crate) fn new(
        name: String,
        pvalue: f64,
        count: u64,
        set_size: u64,
        hits: GeneSet,
        fold_enrichment: f64,
    ) -> Self {
        Self {
            name,
            pvalue,
            count,
            set_size,
            hits,
            fold_enrichment,
        }
    }

    /// Returns the name of the scored gene set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the p-value of the enrichment
    ///
    /// The p-value indicates the probability of observing at least as many
    /// overlapping genes by chance
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// Returns the number of query genes that are members of the gene set
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the total number of genes in the gene set
    pub fn set_size(&self) -> u64 {
        self.set_size
    }

    /// Returns the overlapping genes themselves
    pub fn hits(&self) -> &GeneSet {
        &self.hits
    }

    /// Returns the fold enrichment over the background population
    ///
    /// The ratio of the observed overlap rate to the rate expected from the
    /// gene set's share of the background. `0.0` when there is no overlap.
    pub fn fold_enrichment(&self) -> f64 {
        self.fold_enrichment
    }
}

/// We have to frequently do divisions starting with u64 values
/// and need to return f64 values. To ensure some kind of safety
/// we use this method to panic in case of overflows.
fn f64_from_u64(n: u64) -> f64 {
    let intermediate: u32 = n
        .try_into()
        .expect("cannot safely create f64 from large u64");
    intermediate.into()
}

/// We have to frequently do divisions starting with usize values
/// and need to return f64 values. To ensure some kind of safety
/// we use this method to panic in case of overflows.
fn f64_from_usize(n: usize) -> f64 {
    let intermediate: u32 = n
        .try_into()
        .expect("cannot safely create f64 from large usize");
    intermediate.into()
}
