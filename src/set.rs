//! Gene sets and collections of named gene sets
//!
//! A [`GeneSet`] is a deduplicated set of gene identifiers. It is used both
//! for the query (the genes of interest) and for the members of each curated
//! category. A [`GeneSetLibrary`] maps unique set names to their members and
//! always iterates in lexicographic name order, so downstream results are
//! deterministic regardless of how the library was assembled.

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A set of unique gene identifiers
///
/// Duplicate identifiers silently collapse during construction.
///
/// # Examples
///
/// ```
/// use ora::GeneSet;
///
/// let genes = GeneSet::from_iter(["TP53", "BRCA1", "TP53"]);
/// assert_eq!(genes.len(), 2);
/// assert!(genes.contains("BRCA1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneSet {
    inner: HashSet<String>,
}

impl GeneSet {
    /// Constructs an empty `GeneSet`
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of genes in the set
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no genes
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if `gene` is a member of the set
    pub fn contains(&self, gene: &str) -> bool {
        self.inner.contains(gene)
    }

    /// Adds a gene to the set
    ///
    /// Returns `false` if the gene was already present
    pub fn insert<G: Into<String>>(&mut self, gene: G) -> bool {
        self.inner.insert(gene.into())
    }

    /// Returns an iterator over the gene identifiers, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }

    /// Returns a new `GeneSet` with the genes present in both sets
    ///
    /// # Examples
    ///
    /// ```
    /// use ora::GeneSet;
    ///
    /// let query = GeneSet::from_iter(["A", "B", "C"]);
    /// let category = GeneSet::from_iter(["B", "C", "D"]);
    /// assert_eq!(query.intersect(&category).len(), 2);
    /// ```
    pub fn intersect(&self, other: &GeneSet) -> GeneSet {
        Self {
            inner: self.inner.intersection(&other.inner).cloned().collect(),
        }
    }
}

impl<G: Into<String>> FromIterator<G> for GeneSet {
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<HashSet<String>> for GeneSet {
    fn from(inner: HashSet<String>) -> Self {
        Self { inner }
    }
}

impl<'a> IntoIterator for &'a GeneSet {
    type Item = &'a String;
    type IntoIter = std::collections::hash_set::Iter<'a, String>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// A collection of named gene sets
///
/// Set names are unique keys. Iteration always yields the sets in
/// lexicographic name order, independent of insertion order.
///
/// `GeneSetLibrary` is the central input of the enrichment pipeline:
///
/// ```mermaid
/// flowchart LR
///     query([GeneSet query]) --> scorer
///     library([GeneSetLibrary]) --> scorer[set_enrichment]
///     scorer --> pvalues([p-value per set])
///     pvalues --> corrector[multiple_testing_correction]
///     corrector --> out([q-values and reject flags])
/// ```
///
/// # Examples
///
/// ```
/// use ora::GeneSetLibrary;
///
/// let mut library = GeneSetLibrary::new();
/// library.insert("wnt signaling", ["WNT1", "FZD1", "LRP5"]);
/// library.insert("apoptosis", ["TP53", "BAX", "CASP3"]);
///
/// // iteration is sorted by name, not by insertion order
/// let names: Vec<&str> = library.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, vec!["apoptosis", "wnt signaling"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneSetLibrary {
    inner: BTreeMap<String, GeneSet>,
}

impl GeneSetLibrary {
    /// Constructs an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of gene sets in the library
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the library contains no gene sets
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Adds a gene set built from an iterator of identifiers
    ///
    /// A set that was previously stored under the same name is replaced
    /// and returned.
    pub fn insert<N, I, G>(&mut self, name: N, members: I) -> Option<GeneSet>
    where
        N: Into<String>,
        I: IntoIterator<Item = G>,
        G: Into<String>,
    {
        self.inner.insert(name.into(), members.into_iter().collect())
    }

    /// Adds an already constructed [`GeneSet`] under the given name
    pub fn insert_set<N: Into<String>>(&mut self, name: N, set: GeneSet) -> Option<GeneSet> {
        self.inner.insert(name.into(), set)
    }

    /// Returns the gene set stored under `name`
    pub fn get(&self, name: &str) -> Option<&GeneSet> {
        self.inner.get(name)
    }

    /// Returns an iterator of `(name, gene set)` pairs in lexicographic
    /// name order
    pub fn iter(&self) -> GeneSets<'_> {
        GeneSets {
            inner: self.inner.iter(),
        }
    }
}

impl From<HashMap<String, HashSet<String>>> for GeneSetLibrary {
    fn from(sets: HashMap<String, HashSet<String>>) -> Self {
        Self {
            inner: sets
                .into_iter()
                .map(|(name, members)| (name, GeneSet::from(members)))
                .collect(),
        }
    }
}

impl<N, I, G> FromIterator<(N, I)> for GeneSetLibrary
where
    N: Into<String>,
    I: IntoIterator<Item = G>,
    G: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(name, members)| (name.into(), members.into_iter().collect()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GeneSetLibrary {
    type Item = (&'a str, &'a GeneSet);
    type IntoIter = GeneSets<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator of the `(name, gene set)` pairs of a [`GeneSetLibrary`],
/// sorted by name
pub struct GeneSets<'a> {
    inner: btree_map::Iter<'a, String, GeneSet>,
}

impl<'a> Iterator for GeneSets<'a> {
    type Item = (&'a str, &'a GeneSet);
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, set)| (name.as_str(), set))
    }
}
