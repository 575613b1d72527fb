use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    io::Write,
    sync::Arc,
};

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info};
use tantivy_common::CountingWriter;

use crate::{
    config::{SortOrder, TruncateProfile},
    directory::{Directory, WritePtr},
    index::DictKeyInfo,
    postings::{PostingEncoder, PostingIterator, TermDictBuilder, TermInfo},
    DocFreq, DocId, Result, ShardexError, TermFreq, END_DOCID,
};

use super::{DocScorer, TruncateIndexWriter, TruncateTriggerInfo};

pub fn truncate_posting_file_name(output_name: &str, profile_name: &str) -> String {
    format!("{}_{}.posting", output_name, profile_name)
}

pub fn truncate_dict_file_name(output_name: &str, profile_name: &str) -> String {
    format!("{}_{}.dict", output_name, profile_name)
}

pub fn truncate_meta_file_name(output_name: &str, profile_name: &str) -> String {
    format!("{}_{}.truncate_meta", output_name, profile_name)
}

const OUTPUT_BUFFER_SIZE: u64 = 64 * 1024;

/// Keeps the `limit` best documents of every term reaching the profile's df
/// threshold and writes them as a standalone index:
///
/// * `<output>_<profile>.posting`: skip list and doc list of each term.
/// * `<output>_<profile>.dict`: [`TermInfo`] per key.
/// * `<output>_<profile>.truncate_meta`: `[dict key][score i64]` per key, the
///   score of the worst kept document.
pub struct SingleTruncateIndexWriter {
    output_name: String,
    profile: TruncateProfile,
    scorer: Arc<dyn DocScorer>,
    directory: Arc<dyn Directory>,
    posting_writer: Option<CountingWriter<WritePtr>>,
    term_infos: Vec<(DictKeyInfo, TermInfo)>,
    boundary_scores: Vec<(DictKeyInfo, i64)>,
}

#[derive(Clone, Copy)]
struct Candidate {
    rank: (i128, Reverse<DocId>),
    docid: DocId,
    tf: TermFreq,
    score: i64,
}

impl Candidate {
    fn new(sort_order: SortOrder, docid: DocId, tf: TermFreq, score: i64) -> Self {
        let ranked_score = match sort_order {
            SortOrder::Descending => score as i128,
            SortOrder::Ascending => -(score as i128),
        };
        Self {
            rank: (ranked_score, Reverse(docid)),
            docid,
            tf,
            score,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl SingleTruncateIndexWriter {
    pub fn new(
        directory: Arc<dyn Directory>,
        output_name: impl Into<String>,
        profile: TruncateProfile,
        scorer: Arc<dyn DocScorer>,
    ) -> Result<Self> {
        let output_name = output_name.into();
        let posting_writer = directory.open_write(&truncate_posting_file_name(
            &output_name,
            profile.name(),
        ))?;
        Ok(Self {
            output_name,
            profile,
            scorer,
            directory,
            posting_writer: Some(CountingWriter::wrap(posting_writer)),
            term_infos: vec![],
            boundary_scores: vec![],
        })
    }

    pub fn profile(&self) -> &TruncateProfile {
        &self.profile
    }

    pub fn term_count(&self) -> usize {
        self.term_infos.len()
    }

    /// Best `limit` documents by profile order, ties broken by lower docid.
    fn select_top_docs(
        &self,
        posting_iterator: &mut dyn PostingIterator,
    ) -> Result<Vec<Candidate>> {
        let limit = self.profile.limit();
        if limit == 0 {
            return Ok(vec![]);
        }
        let mut heap: BinaryHeap<Reverse<Candidate>> =
            BinaryHeap::with_capacity(limit.min(crate::DOC_BLOCK_LEN));
        let mut docid = 0;
        loop {
            docid = posting_iterator.seek(docid)?;
            if docid == END_DOCID {
                break;
            }
            let tf = posting_iterator.term_freq();
            let candidate = Candidate::new(
                self.profile.sort_order(),
                docid,
                tf,
                self.scorer.score(docid, tf),
            );
            if heap.len() < limit {
                heap.push(Reverse(candidate));
            } else if heap.peek().map_or(false, |worst| candidate > worst.0) {
                heap.pop();
                heap.push(Reverse(candidate));
            }
            docid += 1;
        }
        Ok(heap.into_iter().map(|Reverse(candidate)| candidate).collect())
    }

    fn write_dict(&mut self) -> Result<()> {
        self.term_infos.sort_by_key(|(key, _)| *key);
        if self.term_infos.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(ShardexError::InternalError(format!(
                "duplicate key in truncate profile `{}`",
                self.profile.name()
            )));
        }
        let dict_writer = self.directory.open_write(&truncate_dict_file_name(
            &self.output_name,
            self.profile.name(),
        ))?;
        let mut builder = TermDictBuilder::new(dict_writer);
        for (key, term_info) in &self.term_infos {
            builder.insert(key, term_info)?;
        }
        builder.finish()?.flush()?;
        Ok(())
    }

    fn write_meta(&mut self) -> Result<()> {
        self.boundary_scores.sort_by_key(|(key, _)| *key);
        let mut meta_writer = self.directory.open_write(&truncate_meta_file_name(
            &self.output_name,
            self.profile.name(),
        ))?;
        for (key, score) in &self.boundary_scores {
            meta_writer.write_all(&key.to_dict_bytes())?;
            meta_writer.write_i64::<LittleEndian>(*score)?;
        }
        meta_writer.flush()?;
        Ok(())
    }
}

impl TruncateIndexWriter for SingleTruncateIndexWriter {
    fn need_truncate(&self, trigger_info: &TruncateTriggerInfo) -> bool {
        trigger_info.df() >= self.profile.df_threshold()
    }

    fn add_posting(
        &mut self,
        key: DictKeyInfo,
        mut posting_iterator: Box<dyn PostingIterator>,
        df: DocFreq,
    ) -> Result<()> {
        let mut kept = self.select_top_docs(posting_iterator.as_mut())?;
        drop(posting_iterator);
        let Some(boundary) = kept.iter().min().copied() else {
            return Ok(());
        };
        kept.sort_unstable_by_key(|candidate| candidate.docid);

        let mut encoder = PostingEncoder::new();
        for candidate in &kept {
            encoder.add_doc(candidate.docid, candidate.tf)?;
        }
        let encoded = encoder.finish()?;

        let posting_writer = self.posting_writer.as_mut().ok_or_else(|| {
            ShardexError::InternalError(format!(
                "truncate profile `{}` already ended",
                self.profile.name()
            ))
        })?;
        let offset = posting_writer.written_bytes();
        let term_info = encoded.dump(posting_writer, offset)?;
        debug!(
            "truncated {:?} of profile `{}` from {} to {} docs",
            key,
            self.profile.name(),
            df,
            kept.len()
        );
        self.term_infos.push((key, term_info));
        self.boundary_scores.push((key, boundary.score));
        Ok(())
    }

    fn end_posting(&mut self) -> Result<()> {
        let Some(mut posting_writer) = self.posting_writer.take() else {
            return Ok(());
        };
        posting_writer.flush()?;
        let posting_len = posting_writer.written_bytes();
        drop(posting_writer);

        self.write_dict()?;
        self.write_meta()?;
        info!(
            "truncate profile `{}` of `{}` done: {} terms, {} posting bytes",
            self.profile.name(),
            self.output_name,
            self.term_infos.len(),
            posting_len
        );
        Ok(())
    }

    fn estimate_memory_use(
        &self,
        max_posting_len: u64,
        total_doc_count: u64,
        output_segment_count: usize,
    ) -> u64 {
        let kept = std::cmp::min(self.profile.limit() as u64, max_posting_len);
        let candidate_size = std::mem::size_of::<Candidate>() as u64;
        let encoder_size = 2 * std::mem::size_of::<u32>() as u64;
        kept * (candidate_size + encoder_size)
            + self.scorer.estimate_memory_use(total_doc_count)
            + output_segment_count as u64 * OUTPUT_BUFFER_SIZE
    }
}
