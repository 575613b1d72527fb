use tantivy_tokenizer_api::Token;
use xxhash_rust::{xxh3, xxh64};

use crate::schema::{DictHashParams, HashFunction, IndexType};

use super::DictKeyInfo;

/// Turns words into dictionary keys. Numeric indexes key a word by its value,
/// every other index by a stable hash of its bytes.
#[derive(Clone, Debug)]
pub struct DictHasher {
    params: DictHashParams,
    index_type: IndexType,
}

impl DictHasher {
    pub fn new(params: DictHashParams, index_type: IndexType) -> Self {
        Self { params, index_type }
    }

    pub fn params(&self) -> DictHashParams {
        self.params
    }

    /// `None` if a numeric index is given a word that is not an integer.
    pub fn hash_word(&self, word: &str) -> Option<DictKeyInfo> {
        match self.index_type {
            IndexType::Number => parse_number(word).map(DictKeyInfo::new),
            IndexType::Text | IndexType::String => {
                Some(DictKeyInfo::new(self.hash_bytes(word.as_bytes())))
            }
        }
    }

    pub fn hash_token(&self, token: &Token) -> Option<DictKeyInfo> {
        self.hash_word(&token.text)
    }

    pub fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        match self.params.function {
            HashFunction::Xxh3 if self.params.seed == 0 => xxh3::xxh3_64(bytes),
            HashFunction::Xxh3 => xxh3::xxh3_64_with_seed(bytes, self.params.seed),
            HashFunction::Xxh64 => xxh64::xxh64(bytes, self.params.seed),
        }
    }
}

fn parse_number(word: &str) -> Option<u64> {
    let word = word.trim();
    word.parse::<i64>()
        .map(|value| value as u64)
        .or_else(|_| word.parse::<u64>())
        .ok()
}

#[cfg(test)]
mod tests {
    use tantivy_tokenizer_api::Token;

    use crate::{
        index::DictKeyInfo,
        schema::{DictHashParams, HashFunction, IndexType},
    };

    use super::DictHasher;

    #[test]
    fn test_text_hash_is_stable() {
        let hasher = DictHasher::new(DictHashParams::default(), IndexType::Text);
        let key = hasher.hash_word("hello").unwrap();
        assert_eq!(key, hasher.hash_word("hello").unwrap());
        assert_ne!(key, hasher.hash_word("world").unwrap());
        assert_eq!(key.key(), xxhash_rust::xxh3::xxh3_64(b"hello"));

        let token = Token {
            text: "hello".to_string(),
            ..Token::default()
        };
        assert_eq!(hasher.hash_token(&token), Some(key));
    }

    #[test]
    fn test_seeded_functions() {
        let params = DictHashParams {
            function: HashFunction::Xxh64,
            seed: 7,
        };
        let hasher = DictHasher::new(params, IndexType::String);
        assert_eq!(
            hasher.hash_word("abc").unwrap().key(),
            xxhash_rust::xxh64::xxh64(b"abc", 7)
        );

        let unseeded = DictHasher::new(
            DictHashParams {
                function: HashFunction::Xxh64,
                seed: 0,
            },
            IndexType::String,
        );
        assert_ne!(hasher.hash_word("abc"), unseeded.hash_word("abc"));
    }

    #[test]
    fn test_number_index() {
        let hasher = DictHasher::new(DictHashParams::default(), IndexType::Number);
        assert_eq!(hasher.hash_word("42"), Some(DictKeyInfo::new(42)));
        assert_eq!(hasher.hash_word(" 42 "), Some(DictKeyInfo::new(42)));
        assert_eq!(hasher.hash_word("-1"), Some(DictKeyInfo::new(u64::MAX)));
        assert_eq!(
            hasher.hash_word("18446744073709551615"),
            Some(DictKeyInfo::new(u64::MAX))
        );
        assert_eq!(hasher.hash_word("4x"), None);
        assert_eq!(hasher.hash_word(""), None);
    }
}
