use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::{directory::Directory, DocId, Result};

use super::{DictKeyInfo, IndexSegmentUpdater};

/// In-memory patch of an index segment.
///
/// Dumped as one record per key in key order: `[dict key][doc count u32]`
/// followed by `(docid i32, is_delete u8)` pairs in docid order. The last
/// update of a (key, doc) pair wins.
#[derive(Default)]
pub struct PatchIndexSegmentUpdater {
    patches: BTreeMap<DictKeyInfo, BTreeMap<DocId, bool>>,
}

pub type DocPatch = (DocId, bool);

impl PatchIndexSegmentUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_count(&self) -> usize {
        self.patches.len()
    }

    pub fn doc_patches(&self, key: &DictKeyInfo) -> Vec<DocPatch> {
        self.patches
            .get(key)
            .map(|docs| docs.iter().map(|(&docid, &is_delete)| (docid, is_delete)).collect())
            .unwrap_or_default()
    }

    fn write_patches<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for (key, docs) in &self.patches {
            writer.write_all(&key.to_dict_bytes())?;
            writer.write_u32::<LittleEndian>(docs.len() as u32)?;
            for (&docid, &is_delete) in docs {
                writer.write_i32::<LittleEndian>(docid)?;
                writer.write_u8(is_delete as u8)?;
            }
        }
        writer.flush()
    }
}

const DOC_PATCH_LEN: usize = 5;

/// Parses a patch file written by [`PatchIndexSegmentUpdater`].
pub fn read_patch_file(mut data: &[u8]) -> io::Result<Vec<(DictKeyInfo, Vec<DocPatch>)>> {
    let mut records = vec![];
    while !data.is_empty() {
        if data.len() < DictKeyInfo::DICT_BYTES_LEN {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "truncated patch record",
            ));
        }
        let (key_bytes, rest) = data.split_at(DictKeyInfo::DICT_BYTES_LEN);
        data = rest;
        let key = DictKeyInfo::from_dict_bytes(key_bytes)?;
        let count = data.read_u32::<LittleEndian>()? as usize;
        let mut docs = Vec::with_capacity(count.min(data.len() / DOC_PATCH_LEN));
        for _ in 0..count {
            let docid = data.read_i32::<LittleEndian>()?;
            let is_delete = data.read_u8()? != 0;
            docs.push((docid, is_delete));
        }
        records.push((key, docs));
    }
    Ok(records)
}

impl IndexSegmentUpdater for PatchIndexSegmentUpdater {
    fn update(&mut self, docid: DocId, key: DictKeyInfo, is_delete: bool) -> Result<()> {
        self.patches.entry(key).or_default().insert(docid, is_delete);
        Ok(())
    }

    fn dump(&mut self, directory: &dyn Directory, name: &str) -> Result<()> {
        let mut writer = directory.open_write(name)?;
        self.write_patches(&mut writer)?;
        debug!("dumped {} patched keys to `{}`", self.patches.len(), name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        directory::{Directory, RamDirectory},
        index::{DictKeyInfo, IndexSegmentUpdater},
        Result,
    };

    use super::{read_patch_file, PatchIndexSegmentUpdater};

    #[test]
    fn test_dump_sorted_records() -> Result<()> {
        let mut updater = PatchIndexSegmentUpdater::new();
        updater.update(7, DictKeyInfo::new(20), false)?;
        updater.update(3, DictKeyInfo::NULL, true)?;
        updater.update(2, DictKeyInfo::new(20), false)?;
        updater.update(7, DictKeyInfo::new(20), true)?;
        updater.update(1, DictKeyInfo::new(5), false)?;
        assert_eq!(updater.key_count(), 3);
        assert_eq!(updater.doc_patches(&DictKeyInfo::new(20)), vec![(2, false), (7, true)]);

        let directory = RamDirectory::new();
        updater.dump(&directory, "patch")?;
        let data = directory.open_read("patch")?.read_bytes()?;
        let records = read_patch_file(data.as_slice())?;
        assert_eq!(
            records,
            vec![
                (DictKeyInfo::new(5), vec![(1, false)]),
                (DictKeyInfo::new(20), vec![(2, false), (7, true)]),
                (DictKeyInfo::NULL, vec![(3, true)]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_truncated_file() {
        assert!(read_patch_file(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_huge_doc_count() {
        let mut data = DictKeyInfo::new(9).to_dict_bytes().to_vec();
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(data.len(), 13);
        assert!(read_patch_file(&data).is_err());

        data.extend_from_slice(&4i32.to_le_bytes());
        data.push(1);
        assert!(read_patch_file(&data).is_err());
    }
}
