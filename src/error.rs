use std::{io, sync::Arc};

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShardexError {
    /// IO Error.
    #[error("An IO error occurred: '{0}'")]
    IoError(Arc<io::Error>),
    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// The term could not be turned into a dictionary key.
    #[error("Failed to hash term '{word}' of index '{index_name}'")]
    TermHashError { index_name: String, word: String },
    /// A worker thread panicked while processing a work item.
    #[error("Worker panicked: '{0}'")]
    WorkerPanic(String),
    /// Work was submitted to a scheduler that already shut down.
    #[error("Scheduler is shut down")]
    SchedulerShutdown,
    #[error("Internal error: '{0}'")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, ShardexError>;

impl From<io::Error> for ShardexError {
    fn from(io_err: io::Error) -> ShardexError {
        ShardexError::IoError(Arc::new(io_err))
    }
}
