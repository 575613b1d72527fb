mod dict_hasher;
mod dict_key_info;
mod index_reader;
mod index_segment_updater;
mod multi_shard_inverted_index_reader;
mod multi_shard_inverted_index_segment_updater;
mod patch_index_segment_updater;
mod segment_posting;
mod sharding_index_hasher;
mod truncated_index_reader;

pub use dict_hasher::DictHasher;
pub use dict_key_info::DictKeyInfo;
pub use index_reader::InvertedIndexReader;
pub use index_segment_updater::IndexSegmentUpdater;
pub use multi_shard_inverted_index_reader::MultiShardInvertedIndexReader;
pub use multi_shard_inverted_index_segment_updater::MultiShardInvertedIndexSegmentUpdater;
pub use patch_index_segment_updater::{read_patch_file, DocPatch, PatchIndexSegmentUpdater};
pub use segment_posting::SegmentPosting;
pub use sharding_index_hasher::ShardingIndexHasher;
pub use truncated_index_reader::TruncatedIndexReader;
