use std::{io, sync::Arc};

use tantivy_common::OwnedBytes;

use crate::{DocId, TermFreq, END_DOCID};

use super::{
    compression::CompressMode,
    posting_encoder::posting_skip_list_format,
    skip_list::{SkipListDecoder, SkipListEntry, TrailingValues},
    PostingIterator, TermInfo,
};

/// Reads a posting list written by [`PostingEncoder`](super::PostingEncoder).
///
/// The skip list is decoded up front, doc blocks lazily on seek.
pub struct PersistentPostingIterator {
    skip_entries: Arc<[SkipListEntry]>,
    doc_list: OwnedBytes,
    next_block: usize,
    docids: Vec<DocId>,
    tfs: Vec<TermFreq>,
    cursor: usize,
}

impl PersistentPostingIterator {
    /// `posting_data` is the whole posting file.
    pub fn open(term_info: &TermInfo, posting_data: &OwnedBytes) -> io::Result<Self> {
        let file_len = posting_data.len();
        if term_info.skip_range().end > file_len || term_info.posting_range().end > file_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "term info points past the posting file",
            ));
        }
        let skip_data = posting_data.slice(term_info.skip_range());
        let trailing = TrailingValues {
            last_value1: term_info.posting_len,
            value2_total: term_info.total_tf,
        };
        let skip_entries = SkipListDecoder::new(posting_skip_list_format()).decode(
            skip_data.as_slice(),
            term_info.skip_item_count as usize,
            term_info.skip_compress_mode,
            Some(trailing),
        )?;
        Ok(Self {
            skip_entries: skip_entries.into(),
            doc_list: posting_data.slice(term_info.posting_range()),
            next_block: 0,
            docids: Vec::new(),
            tfs: Vec::new(),
            cursor: 0,
        })
    }

    fn decode_block(&mut self, block: usize) -> io::Result<()> {
        let (base_docid, start) = match block {
            0 => (0, 0),
            _ => {
                let previous = &self.skip_entries[block - 1];
                (previous.key as DocId, previous.value1 as usize)
            }
        };
        let end = self.skip_entries[block].value1 as usize;
        if start > end || end > self.doc_list.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("doc block {} out of range", block),
            ));
        }
        let mut reader = &self.doc_list.as_slice()[start..end];

        let mut values = Vec::with_capacity(crate::DOC_BLOCK_LEN);
        CompressMode::PforDelta.decode_u32(&mut reader, 0, &mut values)?;
        self.docids.clear();
        let mut docid = base_docid;
        for delta in values.drain(..) {
            docid = DocId::try_from(delta)
                .ok()
                .and_then(|delta| docid.checked_add(delta))
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, "docid delta overflows")
                })?;
            self.docids.push(docid);
        }
        self.tfs.clear();
        CompressMode::PforDelta.decode_u32(&mut reader, 0, &mut self.tfs)?;
        if self.tfs.len() != self.docids.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "doc block docid and tf counts differ",
            ));
        }
        self.cursor = 0;
        Ok(())
    }
}

impl PostingIterator for PersistentPostingIterator {
    fn seek(&mut self, docid: DocId) -> io::Result<DocId> {
        loop {
            while self.cursor < self.docids.len() && self.docids[self.cursor] < docid {
                self.cursor += 1;
            }
            if let Some(&found) = self.docids.get(self.cursor) {
                return Ok(found);
            }
            while self.next_block < self.skip_entries.len()
                && (self.skip_entries[self.next_block].key as DocId) < docid
            {
                self.next_block += 1;
            }
            if self.next_block == self.skip_entries.len() {
                self.docids.clear();
                self.cursor = 0;
                return Ok(END_DOCID);
            }
            self.decode_block(self.next_block)?;
            self.next_block += 1;
        }
    }

    fn term_freq(&self) -> TermFreq {
        self.tfs.get(self.cursor).copied().unwrap_or(0)
    }

    fn box_clone(&self) -> Box<dyn PostingIterator> {
        Box::new(Self {
            skip_entries: self.skip_entries.clone(),
            doc_list: self.doc_list.clone(),
            next_block: 0,
            docids: Vec::new(),
            tfs: Vec::new(),
            cursor: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tantivy_common::OwnedBytes;

    use crate::{
        postings::{
            collect_postings, compression::CompressMode, PostingEncoder, PostingIterator,
            TermInfo,
        },
        DocId, TermFreq, END_DOCID,
    };

    use super::PersistentPostingIterator;

    fn encode(postings: &[(DocId, TermFreq)]) -> io::Result<PersistentPostingIterator> {
        let mut encoder = PostingEncoder::new();
        for &(docid, tf) in postings {
            encoder.add_doc(docid, tf)?;
        }
        let encoded = encoder.finish()?;
        let mut data = vec![0u8; 3];
        let term_info = encoded.dump(&mut data, 3)?;
        PersistentPostingIterator::open(&term_info, &OwnedBytes::new(data))
    }

    #[test]
    fn test_short_posting() -> io::Result<()> {
        let postings = vec![(0, 2), (4, 1), (9, 7)];
        let mut iter = encode(&postings)?;
        assert_eq!(collect_postings(&mut iter)?, postings);
        Ok(())
    }

    #[test]
    fn test_seek_across_blocks() -> io::Result<()> {
        let postings: Vec<(DocId, TermFreq)> = (0..1500).map(|i| (i * 7 + 1, (i % 4) as u32 + 1)).collect();
        let mut iter = encode(&postings)?;
        assert_eq!(iter.seek(0)?, 1);
        assert_eq!(iter.term_freq(), 1);
        assert_eq!(iter.seek(900)?, 904);
        assert_eq!(iter.seek(5000)?, 5006);
        assert_eq!(iter.term_freq(), (715 % 4) as u32 + 1);
        assert_eq!(iter.seek(10_494)?, 10_494);
        assert_eq!(iter.seek(10_495)?, END_DOCID);

        let mut cloned = iter.box_clone();
        assert_eq!(collect_postings(cloned.as_mut())?, postings);
        Ok(())
    }

    /// One doc block holding raw docid deltas, followed by a single row skip list.
    fn open_raw_block(deltas: &[u32]) -> io::Result<PersistentPostingIterator> {
        let mut data = vec![];
        CompressMode::PforDelta.encode_u32(deltas, &mut data)?;
        CompressMode::PforDelta.encode_u32(&vec![1; deltas.len()], &mut data)?;
        let posting_len = data.len() as u32;
        data.extend_from_slice(&100u32.to_le_bytes());
        let term_info = TermInfo {
            df: deltas.len() as u32,
            total_tf: deltas.len() as u64,
            skip_item_count: 1,
            skip_compress_mode: CompressMode::ShortList,
            skip_offset: posting_len as u64,
            skip_len: 4,
            posting_offset: 0,
            posting_len,
        };
        PersistentPostingIterator::open(&term_info, &OwnedBytes::new(data))
    }

    #[test]
    fn test_docid_overflow_is_rejected() -> io::Result<()> {
        let mut iter = open_raw_block(&[3, 4])?;
        assert_eq!(iter.seek(0)?, 3);
        assert_eq!(iter.seek(4)?, 7);

        let mut iter = open_raw_block(&[i32::MAX as u32, 5])?;
        let err = iter.seek(0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut iter = open_raw_block(&[u32::MAX])?;
        assert!(iter.seek(0).is_err());
        Ok(())
    }
}
