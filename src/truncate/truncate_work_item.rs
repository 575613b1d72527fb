use crate::{
    index::DictKeyInfo, postings::PostingIterator, DocFreq, Result, ShardexError,
};

use super::TruncateIndexWriterRef;

/// Unit of work run by a truncate writer scheduler.
///
/// Releasing the item's resources is its `Drop`, which runs exactly once
/// whether or not `process` ran or failed.
pub trait WorkItem: Send {
    fn process(&mut self) -> Result<()>;
}

/// Feeds one posting clone of one term to one truncate writer.
pub struct TruncateWorkItem {
    key: DictKeyInfo,
    posting_iterator: Option<Box<dyn PostingIterator>>,
    df: DocFreq,
    writer: TruncateIndexWriterRef,
}

impl TruncateWorkItem {
    pub fn new(
        key: DictKeyInfo,
        posting_iterator: Box<dyn PostingIterator>,
        df: DocFreq,
        writer: TruncateIndexWriterRef,
    ) -> Self {
        Self {
            key,
            posting_iterator: Some(posting_iterator),
            df,
            writer,
        }
    }

    pub fn key(&self) -> DictKeyInfo {
        self.key
    }
}

impl WorkItem for TruncateWorkItem {
    fn process(&mut self) -> Result<()> {
        let posting_iterator = self.posting_iterator.take().ok_or_else(|| {
            ShardexError::InternalError(format!("work item of {:?} processed twice", self.key))
        })?;
        self.writer
            .lock()
            .add_posting(self.key, posting_iterator, self.df)
    }
}
