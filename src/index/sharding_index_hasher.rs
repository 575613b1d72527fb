use log::warn;
use tantivy_tokenizer_api::Token;

use crate::{query::Term, schema::IndexConfig};

use super::{DictHasher, DictKeyInfo};

/// Deterministic term to shard assignment of a sharded index.
///
/// Immutable once built, share it read-only between the readers and updaters
/// of every shard.
#[derive(Clone, Debug)]
pub struct ShardingIndexHasher {
    index_name: String,
    dict_hasher: DictHasher,
    shard_count: usize,
    is_number_index: bool,
}

impl ShardingIndexHasher {
    /// Panics if `index_config` is not sharded.
    pub fn new(index_config: &IndexConfig) -> Self {
        assert!(
            index_config.is_sharded(),
            "index `{}` is not a sharded index",
            index_config.name()
        );
        Self {
            index_name: index_config.name().to_string(),
            dict_hasher: DictHasher::new(
                index_config.dict_hash_params(),
                index_config.index_type(),
            ),
            shard_count: index_config.shard_count().unwrap_or_default(),
            is_number_index: index_config.is_number_index(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    pub fn dict_hasher(&self) -> &DictHasher {
        &self.dict_hasher
    }

    /// Hashes `term` and picks its shard. `None` when the term belongs to
    /// another index or cannot be hashed, callers must not guess a shard then.
    pub fn get_sharding_idx(&self, term: &Term) -> Option<(DictKeyInfo, usize)> {
        if term.index_name() != self.index_name {
            warn!(
                "term of index `{}` routed through hasher of index `{}`",
                term.index_name(),
                self.index_name
            );
            return None;
        }
        let Some(word) = term.word() else {
            return Some((DictKeyInfo::NULL, Self::get_sharding_idx_for_null_term()));
        };
        let key = self.dict_hasher.hash_word(word)?;
        Some((key, self.get_sharding_idx_by_key(&key)))
    }

    pub fn get_sharding_idx_by_token(&self, token: &Token) -> Option<usize> {
        self.dict_hasher
            .hash_token(token)
            .map(|key| self.get_sharding_idx_by_key(&key))
    }

    pub fn get_sharding_idx_by_key(&self, key: &DictKeyInfo) -> usize {
        if key.is_null() {
            return Self::get_sharding_idx_for_null_term();
        }
        Self::get_sharding_idx_by_retrieval_key(self.retrieval_hash_key(key), self.shard_count)
    }

    /// Postings of absent fields always live in the first shard.
    pub fn get_sharding_idx_for_null_term() -> usize {
        0
    }

    pub fn get_sharding_idx_by_retrieval_key(retrieval_key: u64, shard_count: usize) -> usize {
        (retrieval_key % shard_count as u64) as usize
    }

    /// Hashed keys are already uniform. Numeric keys are raw values, mix them
    /// so clustered values still spread over shards.
    fn retrieval_hash_key(&self, key: &DictKeyInfo) -> u64 {
        if self.is_number_index {
            mix64(key.key())
        } else {
            key.key()
        }
    }
}

fn mix64(mut value: u64) -> u64 {
    value ^= value >> 33;
    value = value.wrapping_mul(0xff51_afd7_ed55_8ccd);
    value ^= value >> 33;
    value = value.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    value ^= value >> 33;
    value
}

#[cfg(test)]
mod tests {
    use tantivy_tokenizer_api::Token;

    use crate::{
        index::DictKeyInfo,
        query::Term,
        schema::{IndexConfig, IndexType},
    };

    use super::ShardingIndexHasher;

    fn hasher(index_type: IndexType, shard_count: usize) -> ShardingIndexHasher {
        let config = IndexConfig::builder("title", index_type)
            .with_shard_count(shard_count)
            .build();
        ShardingIndexHasher::new(&config)
    }

    #[test]
    fn test_retrieval_key_in_range_and_pure() {
        for shard_count in [1usize, 2, 3, 7, 64, 1000] {
            for key in [0u64, 1, 2, 99, 12345, u64::MAX - 1, u64::MAX] {
                let idx = ShardingIndexHasher::get_sharding_idx_by_retrieval_key(key, shard_count);
                assert!(idx < shard_count);
                assert_eq!(
                    idx,
                    ShardingIndexHasher::get_sharding_idx_by_retrieval_key(key, shard_count)
                );
                assert_eq!(idx as u64, key % shard_count as u64);
            }
        }
    }

    #[test]
    fn test_null_term_goes_to_first_shard() {
        for shard_count in [1, 4, 17] {
            let hasher = hasher(IndexType::Text, shard_count);
            assert_eq!(ShardingIndexHasher::get_sharding_idx_for_null_term(), 0);
            assert_eq!(
                hasher.get_sharding_idx(&Term::null("title")),
                Some((DictKeyInfo::NULL, 0))
            );
            assert_eq!(hasher.get_sharding_idx_by_key(&DictKeyInfo::NULL), 0);
        }
    }

    #[test]
    fn test_term_token_and_key_agree() {
        let hasher = hasher(IndexType::Text, 8);
        for word in ["hello", "world", "rust", "shard"] {
            let (key, idx) = hasher.get_sharding_idx(&Term::new("title", word)).unwrap();
            assert!(idx < 8);
            assert_eq!(hasher.get_sharding_idx_by_key(&key), idx);
            let token = Token {
                text: word.to_string(),
                ..Token::default()
            };
            assert_eq!(hasher.get_sharding_idx_by_token(&token), Some(idx));
        }
    }

    #[test]
    fn test_unhashable_terms() {
        let hasher = hasher(IndexType::Number, 4);
        assert_eq!(hasher.get_sharding_idx(&Term::new("price", "10")), None);
        assert_eq!(hasher.get_sharding_idx(&Term::new("title", "ten")), None);
        assert!(hasher.get_sharding_idx(&Term::new("title", "10")).is_some());
    }

    #[test]
    fn test_numeric_keys_spread() {
        let hasher = hasher(IndexType::Number, 4);
        let mut counts = [0usize; 4];
        for value in 0..64 {
            let (_, idx) = hasher
                .get_sharding_idx(&Term::new("title", (value * 4).to_string()))
                .unwrap();
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|&count| count > 0));
    }

    #[test]
    #[should_panic]
    fn test_not_sharded_panics() {
        let config = IndexConfig::builder("title", IndexType::Text).build();
        ShardingIndexHasher::new(&config);
    }
}
