//! TF-IDF vector space and cosine similarity.
//!
//! Term extraction lowercases the document and keeps words of two or more
//! word characters. IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`, and every
//! document vector is L2-normalized, so cosine similarity is a dot product.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

static TERM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern is valid"));

// Scores this close to 1.0 count as identical documents.
const PERCENT_EPSILON: f64 = 1e-9;

/// Lowercased terms of a document, in order of appearance.
pub fn analyze(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    TERM_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sparse, L2-normalized term weight vector. Ordered so that sums are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        // Iterate the smaller map.
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .map(|(term, w)| w * large.weight(term))
            .sum()
    }
}

/// IDF table fitted over a fixed corpus.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    idf: HashMap<String, f64>,
    n_documents: usize,
}

impl TfidfModel {
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for document in corpus {
            let mut terms = analyze(document.as_ref());
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        Self {
            idf,
            n_documents: corpus.len(),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Projects a document into the fitted space. Terms outside the
    /// vocabulary are dropped.
    pub fn transform(&self, document: &str) -> TermVector {
        let mut counts: HashMap<String, f64> = HashMap::new();
        for term in analyze(document) {
            if self.idf.contains_key(&term) {
                *counts.entry(term).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: BTreeMap<String, f64> = counts
            .into_iter()
            .map(|(term, tf)| {
                let idf = self.idf[&term];
                (term, tf * idf)
            })
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        } else {
            weights.clear();
        }

        TermVector { weights }
    }
}

/// Cosine similarity of two normalized vectors, in [0, 1]. Zero if either
/// vector has no terms.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    a.dot(b).clamp(0.0, 1.0)
}

/// Fits a two-document space over `a` and `b` and compares them in it.
pub fn pair_similarity(a: &str, b: &str) -> f64 {
    let model = TfidfModel::fit(&[a, b]);
    cosine_similarity(&model.transform(a), &model.transform(b))
}

/// Truncates a [0, 1] score to a whole percentage.
pub fn to_percentage(score: f64) -> u8 {
    if score >= 1.0 - PERCENT_EPSILON {
        return 100;
    }
    (score.clamp(0.0, 1.0) * 100.0).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_lowercases_and_drops_single_chars() {
        assert_eq!(
            analyze("Rust, C and Go: 5 years; AWS"),
            vec!["rust", "and", "go", "years", "aws"]
        );
    }

    #[test]
    fn test_identical_documents_score_100() {
        let text = "Backend engineer Go distributed systems";
        let score = pair_similarity(text, text);
        assert!((score - 1.0).abs() < 1e-9);
        assert_eq!(to_percentage(score), 100);
    }

    #[test]
    fn test_disjoint_documents_score_0() {
        let score = pair_similarity("rust tokio axum", "photoshop illustrator figma");
        assert_eq!(score, 0.0);
        assert_eq!(to_percentage(score), 0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = "Senior backend engineer Go distributed systems experience";
        let b = "Backend engineer , 5 years Go , built distributed systems";
        assert_eq!(pair_similarity(a, b), pair_similarity(b, a));
    }

    #[test]
    fn test_empty_document_scores_0() {
        assert_eq!(pair_similarity("", "backend engineer"), 0.0);
        assert_eq!(pair_similarity("backend engineer", ""), 0.0);
        assert_eq!(pair_similarity("", ""), 0.0);
    }

    #[test]
    fn test_case_does_not_affect_terms() {
        let score = pair_similarity("RUST Engineer", "rust engineer");
        assert_eq!(to_percentage(score), 100);
    }

    #[test]
    fn test_smoothed_idf_weights() {
        let model = TfidfModel::fit(&["rust go", "rust java"]);
        assert_eq!(model.n_documents(), 2);
        assert_eq!(model.vocabulary_size(), 3);

        // "rust" appears in both documents: idf = ln(3/3) + 1 = 1
        // "go" appears in one: idf = ln(3/2) + 1
        let v = model.transform("rust go");
        let idf_go = (3.0_f64 / 2.0).ln() + 1.0;
        let norm = (1.0 + idf_go * idf_go).sqrt();
        assert!((v.weight("rust") - 1.0 / norm).abs() < 1e-12);
        assert!((v.weight("go") - idf_go / norm).abs() < 1e-12);
    }

    #[test]
    fn test_transform_ignores_out_of_vocabulary_terms() {
        let model = TfidfModel::fit(&["rust go"]);
        let v = model.transform("python haskell");
        assert!(v.is_zero());
    }

    #[test]
    fn test_partial_overlap_is_between_0_and_1() {
        let score = pair_similarity("rust go kafka", "rust python spark");
        assert!(score > 0.0 && score < 1.0, "got {score}");
    }

    #[test]
    fn test_to_percentage_truncates() {
        assert_eq!(to_percentage(0.129), 12);
        assert_eq!(to_percentage(0.999), 99);
        assert_eq!(to_percentage(1.0), 100);
        assert_eq!(to_percentage(0.0), 0);
        assert_eq!(to_percentage(1.0 - 1e-12), 100);
    }

    #[test]
    fn test_to_percentage_never_rounds_up_below_one() {
        // 0.57 * 100.0 is 56.99999999999999 in binary floating point.
        assert_eq!(to_percentage(0.57), 56);
        assert_eq!(to_percentage(0.29), 28);
    }

    #[test]
    fn test_to_percentage_clamps_out_of_range() {
        assert_eq!(to_percentage(1.5), 100);
        assert_eq!(to_percentage(-0.2), 0);
    }
}
