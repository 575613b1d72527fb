use std::ops::Range;

use async_trait::async_trait;
use downcast_rs::{impl_downcast, DowncastSync};

use crate::{
    postings::{PostingIterator, RangePostingIterator},
    query::Term,
    DocId, Result,
};

use super::SegmentPosting;

/// Read side of one inverted index shard.
///
/// The async variants default to the blocking ones, readers backed by async
/// storage override them.
#[async_trait]
pub trait InvertedIndexReader: Send + Sync + DowncastSync {
    fn lookup(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator>>>;

    /// Lookup restricted to sorted, non overlapping docid ranges.
    fn partial_lookup(
        &self,
        term: &Term,
        ranges: &[Range<DocId>],
    ) -> Result<Option<Box<dyn PostingIterator>>> {
        Ok(self.lookup(term)?.map(|posting_iterator| {
            Box::new(RangePostingIterator::new(posting_iterator, ranges)) as Box<dyn PostingIterator>
        }))
    }

    fn segment_postings(&self, term: &Term) -> Result<Vec<SegmentPosting>>;

    async fn lookup_async(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator>>> {
        self.lookup(term)
    }

    async fn partial_lookup_async(
        &self,
        term: &Term,
        ranges: &[Range<DocId>],
    ) -> Result<Option<Box<dyn PostingIterator>>> {
        self.partial_lookup(term, ranges)
    }

    async fn segment_postings_async(&self, term: &Term) -> Result<Vec<SegmentPosting>> {
        self.segment_postings(term)
    }
}

impl_downcast!(sync InvertedIndexReader);
