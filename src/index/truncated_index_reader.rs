use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use tantivy_common::OwnedBytes;

use crate::{
    directory::Directory,
    postings::{PersistentPostingIterator, PostingIterator, TermDict},
    query::Term,
    truncate::{truncate_dict_file_name, truncate_meta_file_name, truncate_posting_file_name},
    Result, ShardexError,
};

use super::{DictHasher, DictKeyInfo, InvertedIndexReader, SegmentPosting};

/// Reads the index one truncate profile wrote for one shard.
pub struct TruncatedIndexReader {
    dict_hasher: DictHasher,
    term_dict: TermDict,
    posting_data: OwnedBytes,
    boundary_scores: Vec<(DictKeyInfo, i64)>,
}

impl TruncatedIndexReader {
    pub fn open(
        directory: &dyn Directory,
        output_name: &str,
        profile_name: &str,
        dict_hasher: DictHasher,
    ) -> Result<Self> {
        let term_dict =
            TermDict::open(directory.open_read(&truncate_dict_file_name(output_name, profile_name))?)?;
        let posting_data = directory
            .open_read(&truncate_posting_file_name(output_name, profile_name))?
            .read_bytes()?;
        let meta = directory
            .open_read(&truncate_meta_file_name(output_name, profile_name))?
            .read_bytes()?;
        let boundary_scores = read_boundary_scores(meta.as_slice())?;
        Ok(Self {
            dict_hasher,
            term_dict,
            posting_data,
            boundary_scores,
        })
    }

    pub fn term_count(&self) -> usize {
        self.term_dict.num_terms()
    }

    /// Score of the worst document kept for `key`.
    pub fn boundary_score(&self, key: &DictKeyInfo) -> Option<i64> {
        self.boundary_scores
            .binary_search_by(|(probe, _)| probe.cmp(key))
            .ok()
            .map(|idx| self.boundary_scores[idx].1)
    }

    fn dict_key(&self, term: &Term) -> Result<DictKeyInfo> {
        match term.word() {
            None => Ok(DictKeyInfo::NULL),
            Some(word) => {
                self.dict_hasher
                    .hash_word(word)
                    .ok_or_else(|| ShardexError::TermHashError {
                        index_name: term.index_name().to_string(),
                        word: word.to_string(),
                    })
            }
        }
    }
}

fn read_boundary_scores(mut data: &[u8]) -> Result<Vec<(DictKeyInfo, i64)>> {
    let mut boundary_scores = vec![];
    let mut key_bytes = [0u8; DictKeyInfo::DICT_BYTES_LEN];
    while !data.is_empty() {
        data.read_exact(&mut key_bytes)?;
        let key = DictKeyInfo::from_dict_bytes(&key_bytes)?;
        let score = data.read_i64::<LittleEndian>()?;
        boundary_scores.push((key, score));
    }
    Ok(boundary_scores)
}

impl InvertedIndexReader for TruncatedIndexReader {
    fn lookup(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator>>> {
        let key = self.dict_key(term)?;
        let Some(term_info) = self.term_dict.get(&key)? else {
            return Ok(None);
        };
        let posting_iterator = PersistentPostingIterator::open(&term_info, &self.posting_data)?;
        Ok(Some(Box::new(posting_iterator)))
    }

    fn segment_postings(&self, term: &Term) -> Result<Vec<SegmentPosting>> {
        let key = self.dict_key(term)?;
        Ok(self
            .term_dict
            .get(&key)?
            .map(|term_info| SegmentPosting::new(0, term_info, self.posting_data.clone()))
            .into_iter()
            .collect())
    }
}
