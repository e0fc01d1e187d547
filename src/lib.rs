//! Over-representation analysis of gene sets
//!
//! `ora` answers the question "which of my curated gene sets overlap a query
//! gene list more than expected by chance?". It contains two building blocks
//! that are typically run back to back:
//!
//! 1. [`stats::hypergeom::set_enrichment`] scores every gene set of a
//!    [`GeneSetLibrary`] against a query [`GeneSet`], using the upper tail of
//!    the hypergeometric distribution.
//! 2. [`stats::correction::multiple_testing_correction`] adjusts the
//!    resulting p-values for the number of sets tested, either with the
//!    Bonferroni method or with the Benjamini-Hochberg step-up FDR
//!    procedure.
//!
//! Reading gene set definitions (e.g. GMT files), choosing the background
//! universe and reporting or plotting the results are left to the caller.
//!
//! # Examples
//!
//! ```
//! use ora::stats::correction::{multiple_testing_correction, CorrectionMethod};
//! use ora::stats::hypergeom::set_enrichment;
//! use ora::{GeneSet, GeneSetLibrary, DEFAULT_ALPHA};
//!
//! let query = GeneSet::from_iter(["TP53", "BRCA1", "EGFR"]);
//!
//! let mut library = GeneSetLibrary::new();
//! library.insert("dna repair", ["TP53", "BRCA1", "MDM2", "CDK2"]);
//! library.insert("ras signaling", ["KRAS", "NRAS", "HRAS"]);
//!
//! // scored against the default background of 20,000 genes
//! let enrichments = set_enrichment(&query, &library, None).unwrap();
//! assert_eq!(enrichments.len(), 2);
//! assert_eq!(enrichments[0].name(), "dna repair");
//! assert_eq!(enrichments[0].count(), 2);
//! assert_eq!(enrichments[1].count(), 0);
//!
//! let pvalues: Vec<f64> = enrichments.iter().map(|e| e.pvalue()).collect();
//! let corrected = multiple_testing_correction(
//!     &pvalues,
//!     DEFAULT_ALPHA,
//!     CorrectionMethod::BenjaminiHochberg,
//! );
//! assert_eq!(corrected.qvalues().len(), 2);
//! assert!(corrected.reject()[0]);
//! ```
use thiserror::Error;

pub mod set;
pub mod stats;

pub use set::{GeneSet, GeneSetLibrary};

/// Background population size used when the caller does not specify one
///
/// 20,000 is the conventional approximation of the number of protein-coding
/// genes in the human genome.
pub const DEFAULT_BACKGROUND_SIZE: u64 = 20_000;

/// Default significance threshold for multiple testing correction
pub const DEFAULT_ALPHA: f64 = 0.05;

#[derive(Error, Debug)]
pub enum OraError {
    #[error("unknown correction method: {0}")]
    UnknownCorrectionMethod(String),
    #[error("gene set library must not be empty")]
    EmptyLibrary,
    #[error("background size must be a positive integer, got {0}")]
    InvalidBackgroundSize(u64),
    #[error(
        "background size {background} is smaller than the gene set ({set_size}) or the query ({query_size})"
    )]
    BackgroundTooSmall {
        background: u64,
        set_size: u64,
        query_size: u64,
    },
}

/// Crate-wide `Result` type
pub type OraResult<T> = Result<T, OraError>;
