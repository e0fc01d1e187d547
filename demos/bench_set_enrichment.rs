//! Scores a large synthetic gene set library and counts the sets with a
//! p-value < 0.005, either single-threaded or chunked across threads

use rayon::prelude::*;

use ora::stats::hypergeom::set_enrichment;
use ora::stats::Enrichment;
use ora::{GeneSet, GeneSetLibrary};

const N_SETS: usize = 20_000;
const CHUNK_SIZE: usize = 500;

fn build_library(n_sets: usize) -> GeneSetLibrary {
    (0..n_sets)
        .map(|set_idx| {
            let members: Vec<String> = (0..30)
                .map(|member_idx| format!("G{}", (set_idx * 13 + member_idx * 131) % 20_000))
                .collect();
            (format!("set{set_idx:05}"), members)
        })
        .collect()
}

fn build_query() -> GeneSet {
    (0..300).map(|idx| format!("G{}", idx * 61)).collect()
}

fn count_enriched(enrichments: &[Enrichment]) -> usize {
    enrichments
        .iter()
        .filter(|enrichment| enrichment.pvalue() < 0.005)
        .count()
}

fn single_threaded(query: &GeneSet, library: &GeneSetLibrary) -> usize {
    let enrichments = set_enrichment(query, library, None).expect("scoring must succeed");
    count_enriched(&enrichments)
}

/// Scores the library in independent chunks and reassembles the results
/// in set-name order afterwards
fn multi_threaded(query: &GeneSet, library: &GeneSetLibrary) -> usize {
    let chunks: Vec<GeneSetLibrary> = library
        .iter()
        .collect::<Vec<_>>()
        .chunks(CHUNK_SIZE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|(name, set)| (name.to_string(), set.iter().map(str::to_string)))
                .collect()
        })
        .collect();

    let mut enrichments: Vec<Enrichment> = chunks
        .par_iter()
        .map(|chunk| set_enrichment(query, chunk, None).expect("scoring must succeed"))
        .flatten()
        .collect();
    enrichments.sort_by(|a, b| a.name().cmp(b.name()));

    count_enriched(&enrichments)
}

fn main() {
    let query = build_query();
    let library = build_library(N_SETS);

    let enriched = if std::env::args().nth(1).is_some() {
        multi_threaded(&query, &library)
    } else {
        single_threaded(&query, &library)
    };

    println!("Highly enriched: {enriched}");
}
