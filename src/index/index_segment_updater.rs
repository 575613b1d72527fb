use crate::{directory::Directory, DocId, Result};

use super::DictKeyInfo;

/// Collects per-document changes of one index segment.
pub trait IndexSegmentUpdater: Send {
    fn update(&mut self, docid: DocId, key: DictKeyInfo, is_delete: bool) -> Result<()>;

    /// Persists the collected changes as `name` in `directory`.
    fn dump(&mut self, directory: &dyn Directory, name: &str) -> Result<()>;
}
