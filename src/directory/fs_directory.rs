use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use tantivy_common::file_slice::FileSlice;

use super::{Directory, WritePtr};

pub struct FsDirectory {
    root: PathBuf,
}

impl FsDirectory {
    pub fn open<P: AsRef<Path>>(root: P) -> io::Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Directory for FsDirectory {
    fn open_write(&self, name: &str) -> io::Result<WritePtr> {
        let file = File::create(self.root.join(name))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn open_read(&self, name: &str) -> io::Result<FileSlice> {
        let data = fs::read(self.root.join(name))?;
        Ok(FileSlice::from(data))
    }

    fn exists(&self, name: &str) -> bool {
        self.root.join(name).exists()
    }
}
