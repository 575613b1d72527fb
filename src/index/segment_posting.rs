use std::io;

use tantivy_common::OwnedBytes;

use crate::{
    postings::{PersistentPostingIterator, TermInfo},
    DocId,
};

/// Encoded posting list of one term in one segment.
#[derive(Clone)]
pub struct SegmentPosting {
    base_docid: DocId,
    term_info: TermInfo,
    posting_data: OwnedBytes,
}

impl SegmentPosting {
    /// `posting_data` is the segment's whole posting file.
    pub fn new(base_docid: DocId, term_info: TermInfo, posting_data: OwnedBytes) -> Self {
        Self {
            base_docid,
            term_info,
            posting_data,
        }
    }

    pub fn base_docid(&self) -> DocId {
        self.base_docid
    }

    pub fn term_info(&self) -> &TermInfo {
        &self.term_info
    }

    pub fn doc_count(&self) -> usize {
        self.term_info.df as usize
    }

    /// Iterates segment local docids.
    pub fn posting_iterator(&self) -> io::Result<PersistentPostingIterator> {
        PersistentPostingIterator::open(&self.term_info, &self.posting_data)
    }
}
