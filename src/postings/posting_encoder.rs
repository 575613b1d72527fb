use std::io::{self, Write};

use crate::{DocId, TermFreq, DOC_BLOCK_LEN};

use super::{
    compression::CompressMode,
    skip_list::{BufferedSkipListWriter, FinishedSkipList, SkipListFormat, SkipListKind},
    ByteSliceWriter, SealedByteSliceList, TermInfo,
};

/// Encodes one term's documents into blocks of [`DOC_BLOCK_LEN`] docid deltas
/// and term frequencies, each block indexed by a three column skip list row:
/// last docid, doc list length after the block, block tf sum.
pub struct PostingEncoder {
    docid_buffer: Vec<u32>,
    tf_buffer: Vec<u32>,
    last_docid: DocId,
    block_base_docid: DocId,
    df: u32,
    total_tf: u64,
    doc_list_writer: ByteSliceWriter,
    skip_list_writer: BufferedSkipListWriter,
}

pub struct EncodedPosting {
    df: u32,
    total_tf: u64,
    doc_list: SealedByteSliceList,
    skip_list: FinishedSkipList,
}

pub fn posting_skip_list_format() -> SkipListFormat {
    SkipListFormat::builder().with_kind(SkipListKind::Tri).build()
}

impl PostingEncoder {
    pub fn new() -> Self {
        Self {
            docid_buffer: Vec::with_capacity(DOC_BLOCK_LEN),
            tf_buffer: Vec::with_capacity(DOC_BLOCK_LEN),
            last_docid: 0,
            block_base_docid: 0,
            df: 0,
            total_tf: 0,
            doc_list_writer: ByteSliceWriter::new(),
            skip_list_writer: BufferedSkipListWriter::new(posting_skip_list_format()),
        }
    }

    /// Docids must be added in strictly increasing order.
    pub fn add_doc(&mut self, docid: DocId, tf: TermFreq) -> io::Result<()> {
        if docid < 0 || (self.df > 0 && docid <= self.last_docid) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("docid {} out of order after {}", docid, self.last_docid),
            ));
        }
        let previous = if self.docid_buffer.is_empty() {
            self.block_base_docid
        } else {
            self.last_docid
        };
        self.docid_buffer.push((docid - previous) as u32);
        self.tf_buffer.push(tf);
        self.last_docid = docid;
        self.df += 1;
        self.total_tf += tf as u64;
        if self.docid_buffer.len() == DOC_BLOCK_LEN {
            self.flush_block()?;
        }
        Ok(())
    }

    pub fn df(&self) -> u32 {
        self.df
    }

    fn flush_block(&mut self) -> io::Result<()> {
        if self.docid_buffer.is_empty() {
            return Ok(());
        }
        CompressMode::PforDelta.encode_u32(&self.docid_buffer, &mut self.doc_list_writer)?;
        CompressMode::PforDelta.encode_u32(&self.tf_buffer, &mut self.doc_list_writer)?;
        let block_tf: u32 = self.tf_buffer.iter().sum();
        self.skip_list_writer.add_tri_item(
            self.last_docid as u32,
            self.doc_list_writer.total_size() as u32,
            block_tf,
        )?;
        self.docid_buffer.clear();
        self.tf_buffer.clear();
        self.block_base_docid = self.last_docid;
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<EncodedPosting> {
        self.flush_block()?;
        Ok(EncodedPosting {
            df: self.df,
            total_tf: self.total_tf,
            doc_list: self.doc_list_writer.into_sealed(),
            skip_list: self.skip_list_writer.finish_flush()?,
        })
    }
}

impl Default for PostingEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodedPosting {
    pub fn df(&self) -> u32 {
        self.df
    }

    pub fn total_tf(&self) -> u64 {
        self.total_tf
    }

    pub fn skip_list(&self) -> &FinishedSkipList {
        &self.skip_list
    }

    pub fn dump_size(&self) -> usize {
        self.skip_list.estimate_dump_size() + self.doc_list.total_size()
    }

    /// Writes the skip list followed by the doc list. `offset` is the position
    /// of `writer` in the posting file, the returned record points there.
    pub fn dump(&self, writer: &mut dyn Write, offset: u64) -> io::Result<TermInfo> {
        let skip_len = self.skip_list.dump(writer)?;
        let posting_len = self.doc_list.dump(writer)?;
        Ok(TermInfo {
            df: self.df,
            total_tf: self.total_tf,
            skip_item_count: self.skip_list.item_count() as u32,
            skip_compress_mode: self.skip_list.compress_mode(),
            skip_offset: offset,
            skip_len: skip_len as u32,
            posting_offset: offset + skip_len as u64,
            posting_len: posting_len as u32,
        })
    }
}
