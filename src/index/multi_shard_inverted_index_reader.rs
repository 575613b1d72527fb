use std::{ops::Range, sync::Arc};

use async_trait::async_trait;

use crate::{postings::PostingIterator, query::Term, DocId, Result, ShardexError};

use super::{InvertedIndexReader, SegmentPosting, ShardingIndexHasher};

/// Routes every lookup to the one shard owning the term.
pub struct MultiShardInvertedIndexReader {
    hasher: Arc<ShardingIndexHasher>,
    shard_readers: Vec<Arc<dyn InvertedIndexReader>>,
}

impl MultiShardInvertedIndexReader {
    pub fn new(
        hasher: Arc<ShardingIndexHasher>,
        shard_readers: Vec<Arc<dyn InvertedIndexReader>>,
    ) -> Result<Self> {
        if shard_readers.len() != hasher.shard_count() {
            return Err(ShardexError::InvalidArgument(format!(
                "{} shard readers for {} shards",
                shard_readers.len(),
                hasher.shard_count()
            )));
        }
        Ok(Self {
            hasher,
            shard_readers,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shard_readers.len()
    }

    pub fn shard_reader(&self, shard_idx: usize) -> Option<&Arc<dyn InvertedIndexReader>> {
        self.shard_readers.get(shard_idx)
    }

    fn route(&self, term: &Term) -> Result<&dyn InvertedIndexReader> {
        let (_, shard_idx) =
            self.hasher
                .get_sharding_idx(term)
                .ok_or_else(|| ShardexError::TermHashError {
                    index_name: term.index_name().to_string(),
                    word: term.word().unwrap_or_default().to_string(),
                })?;
        Ok(self.shard_readers[shard_idx].as_ref())
    }
}

#[async_trait]
impl InvertedIndexReader for MultiShardInvertedIndexReader {
    fn lookup(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator>>> {
        self.route(term)?.lookup(term)
    }

    fn partial_lookup(
        &self,
        term: &Term,
        ranges: &[Range<DocId>],
    ) -> Result<Option<Box<dyn PostingIterator>>> {
        self.route(term)?.partial_lookup(term, ranges)
    }

    fn segment_postings(&self, term: &Term) -> Result<Vec<SegmentPosting>> {
        self.route(term)?.segment_postings(term)
    }

    async fn lookup_async(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator>>> {
        self.route(term)?.lookup_async(term).await
    }

    async fn partial_lookup_async(
        &self,
        term: &Term,
        ranges: &[Range<DocId>],
    ) -> Result<Option<Box<dyn PostingIterator>>> {
        self.route(term)?.partial_lookup_async(term, ranges).await
    }

    async fn segment_postings_async(&self, term: &Term) -> Result<Vec<SegmentPosting>> {
        self.route(term)?.segment_postings_async(term).await
    }
}
