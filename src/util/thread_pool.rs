//! Bounded worker pool used to run truncate work items.
//!
//! Two submission policies are offered:
//! [`ThreadPool::submit_blocking`] always accepts the job and back-pressures the
//! caller while the queue is full, [`ThreadPool::try_submit`] drops the job when
//! the queue is full and reports it to the caller.

use std::{
    any::Any,
    io,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread,
};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::error;
use parking_lot::{Condvar, Mutex};

use crate::{Result, ShardexError};

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct ThreadPool {
    thread_count: usize,
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    state: Arc<PoolState>,
}

#[derive(Default)]
struct PoolState {
    pending: Mutex<usize>,
    idle: Condvar,
    panic: Mutex<Option<Box<dyn Any + Send>>>,
}

impl PoolState {
    fn start_one(&self) {
        *self.pending.lock() += 1;
    }

    fn finish_one(&self) {
        let mut pending = self.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }
}

impl ThreadPool {
    /// Spawns `thread_count` workers sharing a queue of at most
    /// `queue_capacity` pending jobs.
    ///
    /// # Panics
    ///
    /// Panics if `thread_count` is 0.
    pub fn new(thread_count: usize, queue_capacity: usize, name: &str) -> io::Result<Self> {
        assert_ne!(thread_count, 0);

        let (sender, receiver) = crossbeam_channel::bounded::<Job>(queue_capacity);
        let state = Arc::new(PoolState::default());
        let mut workers = Vec::with_capacity(thread_count);
        for i in 0..thread_count {
            let receiver = receiver.clone();
            let state = state.clone();
            let worker = thread::Builder::new()
                .name(format!("{}-{}", name, i))
                .spawn(move || Self::thread_fn(receiver, state))?;
            workers.push(worker);
        }

        Ok(Self {
            thread_count,
            sender: Some(sender),
            workers,
            state,
        })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Enqueues `job`, blocking while the queue is full. The job is never dropped.
    pub fn submit_blocking<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(ShardexError::SchedulerShutdown)?;
        self.state.start_one();
        if sender.send(Box::new(job)).is_err() {
            self.state.finish_one();
            return Err(ShardexError::SchedulerShutdown);
        }
        Ok(())
    }

    /// Enqueues `job` only if there is room for it, returns whether it was accepted.
    pub fn try_submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(sender) = self.sender.as_ref() else {
            return false;
        };
        self.state.start_one();
        match sender.try_send(Box::new(job)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.state.finish_one();
                false
            }
        }
    }

    /// Blocks until every job submitted so far has run.
    ///
    /// If one of those jobs panicked, the first panic payload is handed back
    /// the same way [`thread::JoinHandle::join`] does.
    pub fn wait_idle(&self) -> thread::Result<()> {
        let mut pending = self.state.pending.lock();
        while *pending > 0 {
            self.state.idle.wait(&mut pending);
        }
        drop(pending);

        match self.state.panic.lock().take() {
            Some(payload) => Err(payload),
            None => Ok(()),
        }
    }

    fn thread_fn(receiver: Receiver<Job>, state: Arc<PoolState>) {
        while let Ok(job) = receiver.recv() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || job())) {
                error!("job panicked: {}", panic_message(payload.as_ref()));
                let mut panic = state.panic.lock();
                if panic.is_none() {
                    *panic = Some(payload);
                }
            }
            state.finish_one();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
