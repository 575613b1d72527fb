pub mod config;
pub mod directory;
pub mod error;
pub mod index;
pub mod postings;
pub mod query;
pub mod schema;
pub mod truncate;
pub mod util;

pub use error::{Result, ShardexError};

pub type DocId = i32;
pub type TermFreq = u32;
pub type DocFreq = i64;

pub const DOC_BLOCK_LEN: usize = 128;
pub const END_DOCID: DocId = DocId::MAX;

pub const SKIP_LIST_BUFFER_SIZE: usize = 32;
pub const MAX_UNCOMPRESSED_SKIP_LIST_SIZE: usize = 10;

pub const DEFAULT_TRUNCATE_THREAD_COUNT: usize = 1;
pub const MAX_TRUNCATE_THREAD_COUNT: usize = 512;
