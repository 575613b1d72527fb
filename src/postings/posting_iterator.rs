use std::{io, ops::Range, sync::Arc};

use crate::{DocId, TermFreq, END_DOCID};

/// Forward-only cursor over one term's posting list.
pub trait PostingIterator: Send {
    /// Moves to the first document `>= docid` and returns it, or [`END_DOCID`]
    /// once the list is exhausted.
    fn seek(&mut self, docid: DocId) -> io::Result<DocId>;

    /// Term frequency of the document the cursor is on.
    fn term_freq(&self) -> TermFreq;

    /// A new cursor over the same list, positioned before its first document.
    /// Shares no mutable state with `self`.
    fn box_clone(&self) -> Box<dyn PostingIterator>;
}

impl Clone for Box<dyn PostingIterator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Drains `posting_iterator` into `(docid, tf)` pairs.
pub fn collect_postings(
    posting_iterator: &mut dyn PostingIterator,
) -> io::Result<Vec<(DocId, TermFreq)>> {
    let mut postings = vec![];
    let mut docid = 0;
    loop {
        docid = posting_iterator.seek(docid)?;
        if docid == END_DOCID {
            break;
        }
        postings.push((docid, posting_iterator.term_freq()));
        docid += 1;
    }
    Ok(postings)
}

/// Posting list held in memory, sorted by docid.
#[derive(Clone)]
pub struct VecPostingIterator {
    postings: Arc<[(DocId, TermFreq)]>,
    cursor: usize,
}

impl VecPostingIterator {
    pub fn new(postings: Vec<(DocId, TermFreq)>) -> Self {
        debug_assert!(postings.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            postings: postings.into(),
            cursor: 0,
        }
    }

    pub fn from_docids(docids: impl IntoIterator<Item = DocId>) -> Self {
        Self::new(docids.into_iter().map(|docid| (docid, 1)).collect())
    }

    pub fn doc_count(&self) -> usize {
        self.postings.len()
    }
}

impl PostingIterator for VecPostingIterator {
    fn seek(&mut self, docid: DocId) -> io::Result<DocId> {
        while self.cursor < self.postings.len() && self.postings[self.cursor].0 < docid {
            self.cursor += 1;
        }
        Ok(self
            .postings
            .get(self.cursor)
            .map_or(END_DOCID, |&(docid, _)| docid))
    }

    fn term_freq(&self) -> TermFreq {
        self.postings.get(self.cursor).map_or(0, |&(_, tf)| tf)
    }

    fn box_clone(&self) -> Box<dyn PostingIterator> {
        Box::new(Self {
            postings: self.postings.clone(),
            cursor: 0,
        })
    }
}

/// Restricts another iterator to sorted, non overlapping docid ranges.
pub struct RangePostingIterator {
    inner: Box<dyn PostingIterator>,
    ranges: Arc<[Range<DocId>]>,
    range_cursor: usize,
}

impl RangePostingIterator {
    pub fn new(inner: Box<dyn PostingIterator>, ranges: &[Range<DocId>]) -> Self {
        debug_assert!(ranges.windows(2).all(|w| w[0].end <= w[1].start));
        Self {
            inner,
            ranges: ranges.into(),
            range_cursor: 0,
        }
    }
}

impl PostingIterator for RangePostingIterator {
    fn seek(&mut self, mut docid: DocId) -> io::Result<DocId> {
        loop {
            while self.range_cursor < self.ranges.len()
                && self.ranges[self.range_cursor].end <= docid
            {
                self.range_cursor += 1;
            }
            let Some(range) = self.ranges.get(self.range_cursor) else {
                return Ok(END_DOCID);
            };
            let found = self.inner.seek(std::cmp::max(docid, range.start))?;
            if found == END_DOCID || found < range.end {
                return Ok(found);
            }
            docid = found;
        }
    }

    fn term_freq(&self) -> TermFreq {
        self.inner.term_freq()
    }

    fn box_clone(&self) -> Box<dyn PostingIterator> {
        Box::new(Self {
            inner: self.inner.box_clone(),
            ranges: self.ranges.clone(),
            range_cursor: 0,
        })
    }
}
