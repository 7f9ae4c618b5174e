//! The scoring pipeline: extraction, normalization, TF-IDF scoring and
//! batch orchestration.

pub mod batch;
pub mod extract;
pub mod normalize;
pub mod stopwords;
pub mod tfidf;
