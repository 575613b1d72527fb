use std::sync::Arc;

use crate::{directory::Directory, query::Term, DocId, Result, ShardexError};

use super::{DictKeyInfo, IndexSegmentUpdater, ShardingIndexHasher};

/// Routes every update to the updater of the shard owning the key.
pub struct MultiShardInvertedIndexSegmentUpdater {
    hasher: Arc<ShardingIndexHasher>,
    shard_updaters: Vec<Box<dyn IndexSegmentUpdater>>,
}

impl MultiShardInvertedIndexSegmentUpdater {
    pub fn new(
        hasher: Arc<ShardingIndexHasher>,
        shard_updaters: Vec<Box<dyn IndexSegmentUpdater>>,
    ) -> Result<Self> {
        if shard_updaters.len() != hasher.shard_count() {
            return Err(ShardexError::InvalidArgument(format!(
                "{} shard updaters for {} shards",
                shard_updaters.len(),
                hasher.shard_count()
            )));
        }
        Ok(Self {
            hasher,
            shard_updaters,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shard_updaters.len()
    }

    /// Name under which shard `shard_idx` of segment `name` is dumped.
    pub fn shard_file_name(name: &str, shard_idx: usize) -> String {
        format!("{}_{}", name, shard_idx)
    }

    /// Hashes `term` before routing, fails if it cannot be hashed.
    pub fn update_term(&mut self, docid: DocId, term: &Term, is_delete: bool) -> Result<()> {
        let (key, shard_idx) =
            self.hasher
                .get_sharding_idx(term)
                .ok_or_else(|| ShardexError::TermHashError {
                    index_name: term.index_name().to_string(),
                    word: term.word().unwrap_or_default().to_string(),
                })?;
        self.shard_updaters[shard_idx].update(docid, key, is_delete)
    }
}

impl IndexSegmentUpdater for MultiShardInvertedIndexSegmentUpdater {
    fn update(&mut self, docid: DocId, key: DictKeyInfo, is_delete: bool) -> Result<()> {
        let shard_idx = self.hasher.get_sharding_idx_by_key(&key);
        self.shard_updaters[shard_idx].update(docid, key, is_delete)
    }

    fn dump(&mut self, directory: &dyn Directory, name: &str) -> Result<()> {
        for (shard_idx, updater) in self.shard_updaters.iter_mut().enumerate() {
            updater.dump(directory, &Self::shard_file_name(name, shard_idx))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        directory::{Directory, RamDirectory},
        index::{
            read_patch_file, DictKeyInfo, IndexSegmentUpdater, PatchIndexSegmentUpdater,
            ShardingIndexHasher,
        },
        query::Term,
        schema::{IndexConfig, IndexType},
        Result, ShardexError,
    };

    use super::MultiShardInvertedIndexSegmentUpdater;

    fn updater(shard_count: usize) -> (Arc<ShardingIndexHasher>, MultiShardInvertedIndexSegmentUpdater) {
        let config = IndexConfig::builder("tag", IndexType::String)
            .with_shard_count(shard_count)
            .build();
        let hasher = Arc::new(ShardingIndexHasher::new(&config));
        let shard_updaters = (0..shard_count)
            .map(|_| Box::new(PatchIndexSegmentUpdater::new()) as Box<dyn IndexSegmentUpdater>)
            .collect();
        let updater = MultiShardInvertedIndexSegmentUpdater::new(hasher.clone(), shard_updaters).unwrap();
        (hasher, updater)
    }

    #[test]
    fn test_each_key_lands_in_one_shard() -> Result<()> {
        let (hasher, mut updater) = updater(4);
        let words = ["red", "green", "blue", "cyan", "magenta", "yellow", "black"];
        for (docid, word) in words.iter().enumerate() {
            updater.update_term(docid as i32, &Term::new("tag", *word), false)?;
        }
        updater.update_term(9, &Term::null("tag"), true)?;

        let directory = RamDirectory::new();
        updater.dump(&directory, "seg_0_tag")?;
        assert_eq!(
            directory.file_names(),
            vec!["seg_0_tag_0", "seg_0_tag_1", "seg_0_tag_2", "seg_0_tag_3"]
        );

        let mut seen = 0;
        for shard_idx in 0..4 {
            let data = directory
                .open_read(&MultiShardInvertedIndexSegmentUpdater::shard_file_name("seg_0_tag", shard_idx))?
                .read_bytes()?;
            for (key, _) in read_patch_file(data.as_slice())? {
                assert_eq!(hasher.get_sharding_idx_by_key(&key), shard_idx);
                seen += 1;
            }
        }
        assert_eq!(seen, words.len() + 1);

        let data = directory.open_read("seg_0_tag_0")?.read_bytes()?;
        let records = read_patch_file(data.as_slice())?;
        assert_eq!(records.last(), Some(&(DictKeyInfo::NULL, vec![(9, true)])));
        Ok(())
    }

    #[test]
    fn test_unhashable_term() {
        let (_, mut updater) = updater(2);
        let result = updater.update_term(0, &Term::new("color", "red"), false);
        assert!(matches!(result, Err(ShardexError::TermHashError { .. })));
    }

    #[test]
    fn test_updater_count_must_match() {
        let config = IndexConfig::builder("tag", IndexType::String)
            .with_shard_count(2)
            .build();
        let hasher = Arc::new(ShardingIndexHasher::new(&config));
        assert!(MultiShardInvertedIndexSegmentUpdater::new(hasher, vec![]).is_err());
    }
}
