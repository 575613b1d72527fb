use std::sync::Arc;

use downcast_rs::{impl_downcast, DowncastSync};
use log::{error, warn};
use parking_lot::Mutex;

use crate::{
    util::{panic_message, ThreadPool},
    Result, ShardexError, DEFAULT_TRUNCATE_THREAD_COUNT, MAX_TRUNCATE_THREAD_COUNT,
};

use super::WorkItem;

/// Runs truncate work items, inline or on a pool.
///
/// `wait_finished` is a barrier: once it returns, every item pushed before it
/// has completed.
pub trait TruncateWriterScheduler: DowncastSync {
    fn push_work_item(&self, work_item: Box<dyn WorkItem>) -> Result<()>;

    /// Blocks until all pushed items are done, returns the first failure.
    fn wait_finished(&self) -> Result<()>;

    fn thread_count(&self) -> usize;
}

impl_downcast!(sync TruncateWriterScheduler);

/// Processes every item on the calling thread.
#[derive(Default)]
pub struct SimpleTruncateWriterScheduler;

/// Processes items on a fixed pool of worker threads.
///
/// The first failure of a batch is kept and returned by `wait_finished`. Items
/// of that batch which have not started yet are dropped unprocessed.
pub struct MultiThreadedTruncateWriterScheduler {
    pool: ThreadPool,
    first_error: Arc<Mutex<Option<ShardexError>>>,
}

/// Picks the scheduler for `thread_count`, replacing out of range counts by
/// [`DEFAULT_TRUNCATE_THREAD_COUNT`].
pub fn create_truncate_writer_scheduler(
    thread_count: usize,
) -> Result<Box<dyn TruncateWriterScheduler>> {
    let thread_count = if thread_count == 0 || thread_count > MAX_TRUNCATE_THREAD_COUNT {
        warn!(
            "truncate thread count {} not in [1, {}], using {}",
            thread_count, MAX_TRUNCATE_THREAD_COUNT, DEFAULT_TRUNCATE_THREAD_COUNT
        );
        DEFAULT_TRUNCATE_THREAD_COUNT
    } else {
        thread_count
    };

    if thread_count <= 1 {
        Ok(Box::new(SimpleTruncateWriterScheduler))
    } else {
        Ok(Box::new(MultiThreadedTruncateWriterScheduler::new(
            thread_count,
        )?))
    }
}

impl TruncateWriterScheduler for SimpleTruncateWriterScheduler {
    fn push_work_item(&self, mut work_item: Box<dyn WorkItem>) -> Result<()> {
        let result = work_item.process();
        drop(work_item);
        if let Err(err) = &result {
            error!("truncate work item failed: {}", err);
        }
        result
    }

    fn wait_finished(&self) -> Result<()> {
        Ok(())
    }

    fn thread_count(&self) -> usize {
        1
    }
}

impl MultiThreadedTruncateWriterScheduler {
    pub fn new(thread_count: usize) -> Result<Self> {
        let pool = ThreadPool::new(thread_count, thread_count * 2, "truncate")?;
        Ok(Self {
            pool,
            first_error: Arc::new(Mutex::new(None)),
        })
    }
}

impl TruncateWriterScheduler for MultiThreadedTruncateWriterScheduler {
    fn push_work_item(&self, work_item: Box<dyn WorkItem>) -> Result<()> {
        let first_error = self.first_error.clone();
        self.pool.submit_blocking(move || {
            let mut work_item = work_item;
            if first_error.lock().is_some() {
                return;
            }
            if let Err(err) = work_item.process() {
                error!("truncate work item failed: {}", err);
                first_error.lock().get_or_insert(err);
            }
        })
    }

    fn wait_finished(&self) -> Result<()> {
        let joined = self.pool.wait_idle();
        let first_error = self.first_error.lock().take();
        if let Err(payload) = joined {
            return Err(ShardexError::WorkerPanic(panic_message(payload.as_ref())));
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn thread_count(&self) -> usize {
        self.pool.thread_count()
    }
}
