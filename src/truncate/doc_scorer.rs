use std::sync::Arc;

use crate::{DocId, TermFreq};

/// Ranks the documents of a posting list for truncation.
pub trait DocScorer: Send + Sync {
    fn score(&self, docid: DocId, tf: TermFreq) -> i64;

    /// Bytes held by the scorer for a segment of `total_doc_count` documents.
    fn estimate_memory_use(&self, _total_doc_count: u64) -> u64 {
        0
    }
}

/// Scores a document by the term frequency.
#[derive(Default, Clone, Copy)]
pub struct TermFreqScorer;

impl DocScorer for TermFreqScorer {
    fn score(&self, _docid: DocId, tf: TermFreq) -> i64 {
        tf as i64
    }
}

/// Scores a document by a per-document attribute such as sales or a static rank.
#[derive(Clone)]
pub struct AttributeScorer {
    values: Arc<[i64]>,
    missing_value: i64,
}

impl AttributeScorer {
    /// `values[docid]` is the score of `docid`.
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values: values.into(),
            missing_value: i64::MIN,
        }
    }

    /// Score of documents without a value, the lowest possible by default.
    pub fn with_missing_value(mut self, missing_value: i64) -> Self {
        self.missing_value = missing_value;
        self
    }
}

impl DocScorer for AttributeScorer {
    fn score(&self, docid: DocId, _tf: TermFreq) -> i64 {
        usize::try_from(docid)
            .ok()
            .and_then(|idx| self.values.get(idx))
            .copied()
            .unwrap_or(self.missing_value)
    }

    fn estimate_memory_use(&self, total_doc_count: u64) -> u64 {
        total_doc_count * std::mem::size_of::<i64>() as u64
    }
}
