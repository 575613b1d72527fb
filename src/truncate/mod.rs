//! Truncation of long posting lists into bounded top-K indexes, one per
//! profile, fanned out over a scheduler.

mod doc_scorer;
mod multi_truncate_index_writer;
mod single_truncate_index_writer;
mod truncate_index_writer;
mod truncate_work_item;
mod truncate_writer_scheduler;

pub use doc_scorer::{AttributeScorer, DocScorer, TermFreqScorer};
pub use multi_truncate_index_writer::{MultiTruncateIndexWriter, TruncationPlan};
pub use single_truncate_index_writer::{
    truncate_dict_file_name, truncate_meta_file_name, truncate_posting_file_name,
    SingleTruncateIndexWriter,
};
pub use truncate_index_writer::{TruncateIndexWriter, TruncateIndexWriterRef, TruncateTriggerInfo};
pub use truncate_work_item::{TruncateWorkItem, WorkItem};
pub use truncate_writer_scheduler::{
    create_truncate_writer_scheduler, MultiThreadedTruncateWriterScheduler,
    SimpleTruncateWriterScheduler, TruncateWriterScheduler,
};
