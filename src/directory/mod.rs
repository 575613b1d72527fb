//! Opaque byte sinks and sources used to persist encoded index data.

mod fs_directory;
mod ram_directory;

use std::io::{self, Write};

use tantivy_common::file_slice::FileSlice;

pub use fs_directory::FsDirectory;
pub use ram_directory::RamDirectory;

pub type WritePtr = Box<dyn Write + Send>;

pub trait Directory: Send + Sync {
    /// Creates (or truncates) the file `name` and returns a writer appending to it.
    fn open_write(&self, name: &str) -> io::Result<WritePtr>;

    fn open_read(&self, name: &str) -> io::Result<FileSlice>;

    fn exists(&self, name: &str) -> bool;
}
