use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    config::TruncateSettings, index::DictKeyInfo, postings::PostingIterator, DocFreq, Result,
};

use super::{
    create_truncate_writer_scheduler, TruncateIndexWriter, TruncateIndexWriterRef,
    TruncateTriggerInfo, TruncateWorkItem, TruncateWriterScheduler,
};

/// Writers that want one term, computed before any posting clone is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationPlan {
    trigger_info: TruncateTriggerInfo,
    writer_indices: Vec<usize>,
}

impl TruncationPlan {
    pub fn trigger_info(&self) -> &TruncateTriggerInfo {
        &self.trigger_info
    }

    pub fn writer_indices(&self) -> &[usize] {
        &self.writer_indices
    }

    pub fn needed(&self) -> bool {
        !self.writer_indices.is_empty()
    }

    /// Number of posting clones a dispatch of this plan creates.
    pub fn estimate_posting_count(&self) -> usize {
        self.writer_indices.len()
    }
}

/// Fans every term out to the truncate profiles that want it.
///
/// Driven by one thread. Parallelism only happens inside [`dispatch`], which
/// returns after every clone it pushed has been consumed.
///
/// [`dispatch`]: MultiTruncateIndexWriter::dispatch
pub struct MultiTruncateIndexWriter {
    writers: Vec<TruncateIndexWriterRef>,
    scheduler: Box<dyn TruncateWriterScheduler>,
}

impl MultiTruncateIndexWriter {
    pub fn new(scheduler: Box<dyn TruncateWriterScheduler>) -> Self {
        Self {
            writers: vec![],
            scheduler,
        }
    }

    pub fn with_thread_count(thread_count: usize) -> Result<Self> {
        Ok(Self::new(create_truncate_writer_scheduler(thread_count)?))
    }

    pub fn with_settings(settings: &TruncateSettings) -> Result<Self> {
        Self::with_thread_count(settings.thread_count())
    }

    pub fn add_index_writer(&mut self, writer: Box<dyn TruncateIndexWriter>) {
        self.writers.push(Arc::new(Mutex::new(writer)));
    }

    pub fn internal_writer_count(&self) -> usize {
        self.writers.len()
    }

    pub fn scheduler(&self) -> &dyn TruncateWriterScheduler {
        self.scheduler.as_ref()
    }

    pub fn plan(&self, trigger_info: &TruncateTriggerInfo) -> TruncationPlan {
        let writer_indices = self
            .writers
            .iter()
            .enumerate()
            .filter(|(_, writer)| writer.lock().need_truncate(trigger_info))
            .map(|(idx, _)| idx)
            .collect();
        TruncationPlan {
            trigger_info: *trigger_info,
            writer_indices,
        }
    }

    /// Pushes one clone of `posting_iterator` per planned writer and waits for
    /// all of them, even when a push fails.
    pub fn dispatch(
        &self,
        plan: &TruncationPlan,
        posting_iterator: &dyn PostingIterator,
    ) -> Result<()> {
        let mut push_result = Ok(());
        for &idx in plan.writer_indices() {
            let writer = self.writers[idx].clone();
            let work_item = TruncateWorkItem::new(
                plan.trigger_info.key(),
                posting_iterator.box_clone(),
                plan.trigger_info.df(),
                writer,
            );
            if let Err(err) = self.scheduler.push_work_item(Box::new(work_item)) {
                push_result = Err(err);
                break;
            }
        }
        let wait_result = self.scheduler.wait_finished();
        push_result.and(wait_result)
    }
}

impl TruncateIndexWriter for MultiTruncateIndexWriter {
    fn need_truncate(&self, trigger_info: &TruncateTriggerInfo) -> bool {
        self.plan(trigger_info).needed()
    }

    fn add_posting(
        &mut self,
        key: DictKeyInfo,
        posting_iterator: Box<dyn PostingIterator>,
        df: DocFreq,
    ) -> Result<()> {
        let plan = self.plan(&TruncateTriggerInfo::new(key, df));
        if !plan.needed() {
            return Ok(());
        }
        self.dispatch(&plan, posting_iterator.as_ref())
    }

    fn end_posting(&mut self) -> Result<()> {
        let mut end_result = Ok(());
        for writer in &self.writers {
            let result = writer.lock().end_posting();
            if end_result.is_ok() {
                end_result = result;
            }
        }
        let wait_result = self.scheduler.wait_finished();
        self.writers.clear();
        end_result.and(wait_result)
    }

    fn estimate_memory_use(
        &self,
        max_posting_len: u64,
        total_doc_count: u64,
        output_segment_count: usize,
    ) -> u64 {
        let mut estimates: Vec<u64> = self
            .writers
            .iter()
            .map(|writer| {
                writer.lock().estimate_memory_use(
                    max_posting_len,
                    total_doc_count,
                    output_segment_count,
                )
            })
            .collect();
        estimates.sort_unstable_by(|a, b| b.cmp(a));
        estimates
            .iter()
            .take(self.scheduler.thread_count())
            .sum()
    }
}
