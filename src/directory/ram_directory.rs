use std::{
    collections::HashMap,
    io::{self, Write},
    sync::Arc,
};

use parking_lot::RwLock;
use tantivy_common::file_slice::FileSlice;

use super::{Directory, WritePtr};

#[derive(Clone, Default)]
pub struct RamDirectory {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

struct RamFileWriter {
    name: String,
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl RamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_len(&self, name: &str) -> Option<usize> {
        self.files.read().get(name).map(|data| data.len())
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.files.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Directory for RamDirectory {
    fn open_write(&self, name: &str) -> io::Result<WritePtr> {
        self.files.write().insert(name.to_string(), vec![]);
        Ok(Box::new(RamFileWriter {
            name: name.to_string(),
            files: self.files.clone(),
        }))
    }

    fn open_read(&self, name: &str) -> io::Result<FileSlice> {
        let data = self.files.read().get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("file not found: {}", name))
        })?;
        Ok(FileSlice::from(data))
    }

    fn exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }
}

impl Write for RamFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = self.files.write();
        let data = files.get_mut(&self.name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("file removed: {}", self.name))
        })?;
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
