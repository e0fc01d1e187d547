//! Scores a small built-in gene set library against a query gene list and
//! prints the enrichment table with Benjamini-Hochberg corrected q-values

use ora::stats::correction::{multiple_testing_correction, CorrectionMethod};
use ora::stats::hypergeom::set_enrichment;
use ora::{GeneSet, GeneSetLibrary, DEFAULT_ALPHA};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    let query = GeneSet::from_iter(["TP53", "BRCA1", "BRCA2", "ATM", "CHEK2", "MDM2", "EGFR"]);

    let mut library = GeneSetLibrary::new();
    library.insert(
        "dna damage response",
        ["TP53", "BRCA1", "BRCA2", "ATM", "CHEK2", "RAD51", "PALB2"],
    );
    library.insert("p53 regulation", ["TP53", "MDM2", "MDM4", "CDKN1A"]);
    library.insert("egfr signaling", ["EGFR", "ERBB2", "GRB2", "SOS1", "KRAS"]);
    library.insert("glycolysis", ["HK1", "HK2", "PFKM", "PKM", "ENO1"]);

    let enrichments =
        set_enrichment(&query, &library, None).expect("the built-in library must be scorable");
    let pvalues: Vec<f64> = enrichments.iter().map(|e| e.pvalue()).collect();
    let corrected =
        multiple_testing_correction(&pvalues, DEFAULT_ALPHA, CorrectionMethod::BenjaminiHochberg);

    let mut rows: Vec<_> = enrichments
        .iter()
        .zip(corrected.qvalues().iter().zip(corrected.reject()))
        .collect();
    rows.sort_by(|a, b| {
        a.0.pvalue()
            .partial_cmp(&b.0.pvalue())
            .expect("nan must not appear as pvalue")
    });

    println!("set\toverlap\tpvalue\tqvalue\treject");
    for (enrichment, (qvalue, reject)) in rows {
        println!(
            "{}\t{}/{}\t{:e}\t{:e}\t{}",
            enrichment.name(),
            enrichment.count(),
            enrichment.set_size(),
            enrichment.pvalue(),
            qvalue,
            reject
        );
    }
}
