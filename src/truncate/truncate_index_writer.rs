use std::sync::Arc;

use parking_lot::Mutex;

use crate::{index::DictKeyInfo, postings::PostingIterator, DocFreq, Result};

/// What a truncate writer gets to see before deciding to take a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateTriggerInfo {
    key: DictKeyInfo,
    df: DocFreq,
}

impl TruncateTriggerInfo {
    pub fn new(key: DictKeyInfo, df: DocFreq) -> Self {
        Self { key, df }
    }

    pub fn key(&self) -> DictKeyInfo {
        self.key
    }

    pub fn df(&self) -> DocFreq {
        self.df
    }
}

/// One truncation profile writing its own truncated index.
pub trait TruncateIndexWriter: Send {
    /// Must not depend on anything but `trigger_info` and the writer's settings.
    fn need_truncate(&self, trigger_info: &TruncateTriggerInfo) -> bool;

    /// Truncates and encodes the posting list of `key`, the iterator is owned
    /// by this call.
    fn add_posting(
        &mut self,
        key: DictKeyInfo,
        posting_iterator: Box<dyn PostingIterator>,
        df: DocFreq,
    ) -> Result<()>;

    /// Finalizes the output, called once after the last term.
    fn end_posting(&mut self) -> Result<()>;

    /// Peak bytes used while truncating one term.
    fn estimate_memory_use(
        &self,
        max_posting_len: u64,
        total_doc_count: u64,
        output_segment_count: usize,
    ) -> u64;
}

pub type TruncateIndexWriterRef = Arc<Mutex<Box<dyn TruncateIndexWriter>>>;
