use std::io::{self, Write};

use crate::{
    postings::{
        compression::{get_skip_list_compress_mode, CompressMode},
        BufferedByteSlice, ByteSliceListIterator, SealedByteSliceList,
    },
    SKIP_LIST_BUFFER_SIZE,
};

use super::{SkipListFormat, SkipListKind};

const VALUE_SIZE: usize = std::mem::size_of::<u32>();

/// Skip list writer buffering up to [`SKIP_LIST_BUFFER_SIZE`] rows before
/// encoding them into a byte slice list.
///
/// Keys and `value1` are delta coded against the previous row, `value2` is
/// stored as given.
pub struct BufferedSkipListWriter {
    format: SkipListFormat,
    last_key: u32,
    last_value1: u32,
    buffered_byte_slice: BufferedByteSlice,
}

/// Sealed skip list, the only form that can be dumped.
pub struct FinishedSkipList {
    format: SkipListFormat,
    item_count: usize,
    compress_mode: CompressMode,
    byte_slice_list: SealedByteSliceList,
}

fn final_compress_mode(format: &SkipListFormat, item_count: usize) -> CompressMode {
    match get_skip_list_compress_mode(item_count) {
        CompressMode::PforDelta if format.is_reference_compress() => CompressMode::Reference,
        compress_mode => compress_mode,
    }
}

/// Short lists of three columns are dumped without the last `value1` and
/// `value2`, both can be rebuilt from the posting list they describe.
fn is_trimmed(format: &SkipListFormat, item_count: usize, compress_mode: CompressMode) -> bool {
    item_count > 0 && compress_mode == CompressMode::ShortList && format.column_count() == 3
}

const TRIMMED_SIZE: usize = 2 * VALUE_SIZE;

impl BufferedSkipListWriter {
    pub fn new(format: SkipListFormat) -> Self {
        let buffered_byte_slice = BufferedByteSlice::new(format.multi_value(), SKIP_LIST_BUFFER_SIZE);
        Self {
            format,
            last_key: 0,
            last_value1: 0,
            buffered_byte_slice,
        }
    }

    pub fn format(&self) -> &SkipListFormat {
        &self.format
    }

    pub fn item_count(&self) -> usize {
        self.buffered_byte_slice.total_count()
    }

    pub fn last_key(&self) -> u32 {
        self.last_key
    }

    pub fn last_value1(&self) -> u32 {
        self.last_value1
    }

    pub fn add_tri_item(&mut self, key: u32, value1: u32, value2: u32) -> io::Result<()> {
        assert_eq!(self.format.kind(), SkipListKind::Tri);
        debug_assert!(key >= self.last_key && value1 >= self.last_value1);
        self.buffered_byte_slice.push(0, key - self.last_key);
        self.buffered_byte_slice.push(1, value1 - self.last_value1);
        self.buffered_byte_slice.push(2, value2);
        self.last_key = key;
        self.last_value1 = value1;
        self.end_push()
    }

    pub fn add_pair_item(&mut self, key: u32, value1: u32) -> io::Result<()> {
        assert_eq!(self.format.kind(), SkipListKind::Pair);
        debug_assert!(value1 >= self.last_value1);
        let stored_key = if self.format.is_reference_compress() {
            key
        } else {
            debug_assert!(key >= self.last_key);
            key - self.last_key
        };
        self.buffered_byte_slice.push(0, stored_key);
        self.buffered_byte_slice.push(1, value1 - self.last_value1);
        self.last_key = key;
        self.last_value1 = value1;
        self.end_push()
    }

    pub fn add_single_item(&mut self, delta: u32) -> io::Result<()> {
        assert_eq!(self.format.kind(), SkipListKind::Single);
        self.last_value1 += delta;
        self.buffered_byte_slice.push(0, self.last_value1);
        self.end_push()
    }

    fn end_push(&mut self) -> io::Result<()> {
        if self.buffered_byte_slice.end_push() {
            let compress_mode = if self.format.is_reference_compress() {
                CompressMode::Reference
            } else {
                CompressMode::PforDelta
            };
            self.buffered_byte_slice.flush(compress_mode)?;
        }
        Ok(())
    }

    /// Size [`FinishedSkipList::dump`] would write if the list were finished now.
    pub fn estimate_dump_size(&self) -> usize {
        let item_count = self.item_count();
        let compress_mode = final_compress_mode(&self.format, item_count);
        let size = self.buffered_byte_slice.flushed_size()
            + self.buffered_byte_slice.estimate_flush_size(compress_mode);
        if is_trimmed(&self.format, item_count, compress_mode) {
            size - TRIMMED_SIZE
        } else {
            size
        }
    }

    /// Flushes the remaining rows with the mode chosen for the total row count.
    pub fn finish_flush(mut self) -> io::Result<FinishedSkipList> {
        let item_count = self.item_count();
        let compress_mode = final_compress_mode(&self.format, item_count);
        self.buffered_byte_slice.flush(compress_mode)?;
        Ok(FinishedSkipList {
            format: self.format,
            item_count,
            compress_mode,
            byte_slice_list: self.buffered_byte_slice.into_sealed(),
        })
    }
}

impl FinishedSkipList {
    pub fn format(&self) -> &SkipListFormat {
        &self.format
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn compress_mode(&self) -> CompressMode {
        self.compress_mode
    }

    pub fn byte_slice_list(&self) -> &SealedByteSliceList {
        &self.byte_slice_list
    }

    pub fn estimate_dump_size(&self) -> usize {
        let total_size = self.byte_slice_list.total_size();
        if is_trimmed(&self.format, self.item_count, self.compress_mode) {
            total_size - TRIMMED_SIZE
        } else {
            total_size
        }
    }

    pub fn dump(&self, writer: &mut dyn Write) -> io::Result<usize> {
        if self.item_count == 0 {
            return Ok(0);
        }
        if !is_trimmed(&self.format, self.item_count, self.compress_mode) {
            return self.byte_slice_list.dump(writer);
        }

        let column_len = self.item_count * VALUE_SIZE;
        let mut iter = self.byte_slice_list.iter();
        let mut written = write_range(&mut iter, 0, column_len, writer)?;
        written += write_range(&mut iter, column_len, 2 * column_len - VALUE_SIZE, writer)?;
        written += write_range(
            &mut iter,
            2 * column_len,
            3 * column_len - VALUE_SIZE,
            writer,
        )?;
        Ok(written)
    }
}

fn write_range(
    iter: &mut ByteSliceListIterator<'_>,
    begin: usize,
    end: usize,
    writer: &mut dyn Write,
) -> io::Result<usize> {
    if begin >= end {
        return Ok(0);
    }
    if !iter.seek_slice(begin) {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("skip list column at {} out of range", begin),
        ));
    }
    while iter.has_next(end) {
        writer.write_all(iter.next())?;
    }
    Ok(end - begin)
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::postings::{
        compression::CompressMode,
        skip_list::{SkipListFormat, SkipListKind},
    };

    use super::BufferedSkipListWriter;

    fn le_bytes(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn tri_format() -> SkipListFormat {
        SkipListFormat::builder().with_kind(SkipListKind::Tri).build()
    }

    #[test]
    fn test_empty() -> io::Result<()> {
        let writer = BufferedSkipListWriter::new(tri_format());
        assert_eq!(writer.estimate_dump_size(), 0);
        let finished = writer.finish_flush()?;
        assert_eq!(finished.item_count(), 0);
        assert_eq!(finished.estimate_dump_size(), 0);
        let mut buf = vec![];
        assert_eq!(finished.dump(&mut buf)?, 0);
        assert!(buf.is_empty());
        Ok(())
    }

    #[test]
    fn test_tri_short_list_trims_last_values() -> io::Result<()> {
        let mut writer = BufferedSkipListWriter::new(tri_format());
        writer.add_tri_item(10, 100, 7)?;
        writer.add_tri_item(25, 180, 3)?;
        writer.add_tri_item(30, 200, 9)?;
        assert_eq!(writer.item_count(), 3);
        assert_eq!(writer.estimate_dump_size(), 3 * 3 * 4 - 8);

        let finished = writer.finish_flush()?;
        assert_eq!(finished.compress_mode(), CompressMode::ShortList);
        assert_eq!(finished.estimate_dump_size(), 28);
        let mut buf = vec![];
        assert_eq!(finished.dump(&mut buf)?, 28);

        let mut expect = le_bytes(&[10, 15, 5]);
        expect.extend(le_bytes(&[100, 80]));
        expect.extend(le_bytes(&[7, 3]));
        assert_eq!(buf, expect);
        Ok(())
    }

    #[test]
    fn test_single_tri_item_keeps_only_key() -> io::Result<()> {
        let mut writer = BufferedSkipListWriter::new(tri_format());
        writer.add_tri_item(5, 50, 1)?;
        let finished = writer.finish_flush()?;
        let mut buf = vec![];
        assert_eq!(finished.dump(&mut buf)?, 4);
        assert_eq!(buf, le_bytes(&[5]));
        Ok(())
    }

    #[test]
    fn test_pair_short_list_is_not_trimmed() -> io::Result<()> {
        let format = SkipListFormat::builder().with_kind(SkipListKind::Pair).build();
        let mut writer = BufferedSkipListWriter::new(format);
        writer.add_pair_item(4, 40)?;
        writer.add_pair_item(9, 70)?;
        let finished = writer.finish_flush()?;
        let mut buf = vec![];
        finished.dump(&mut buf)?;
        let mut expect = le_bytes(&[4, 5]);
        expect.extend(le_bytes(&[40, 30]));
        assert_eq!(buf, expect);
        Ok(())
    }

    #[test]
    fn test_pair_reference_keeps_absolute_keys() -> io::Result<()> {
        let format = SkipListFormat::builder()
            .with_kind(SkipListKind::Pair)
            .with_reference_compress(true)
            .build();
        let mut writer = BufferedSkipListWriter::new(format);
        writer.add_pair_item(4, 40)?;
        writer.add_pair_item(9, 70)?;
        assert_eq!(writer.last_key(), 9);
        assert_eq!(writer.last_value1(), 70);
        let finished = writer.finish_flush()?;
        let mut buf = vec![];
        finished.dump(&mut buf)?;
        let mut expect = le_bytes(&[4, 9]);
        expect.extend(le_bytes(&[40, 30]));
        assert_eq!(buf, expect);
        Ok(())
    }

    #[test]
    fn test_single_accumulates() -> io::Result<()> {
        let format = SkipListFormat::builder().with_kind(SkipListKind::Single).build();
        let mut writer = BufferedSkipListWriter::new(format);
        for delta in [3, 4, 5] {
            writer.add_single_item(delta)?;
        }
        assert_eq!(writer.last_value1(), 12);
        let finished = writer.finish_flush()?;
        let mut buf = vec![];
        finished.dump(&mut buf)?;
        assert_eq!(buf, le_bytes(&[3, 7, 12]));
        Ok(())
    }

    #[test]
    fn test_long_list_uses_pfor_delta() -> io::Result<()> {
        let mut writer = BufferedSkipListWriter::new(tri_format());
        for i in 1..=40u32 {
            writer.add_tri_item(i * 128, i * 300, i % 7)?;
        }
        let estimated = writer.estimate_dump_size();
        let finished = writer.finish_flush()?;
        assert_eq!(finished.item_count(), 40);
        assert_eq!(finished.compress_mode(), CompressMode::PforDelta);
        assert_eq!(finished.estimate_dump_size(), estimated);
        let mut buf = vec![];
        assert_eq!(finished.dump(&mut buf)?, estimated);
        assert_eq!(buf.len(), finished.byte_slice_list().total_size());
        Ok(())
    }

    #[test]
    fn test_long_list_reference_mode() -> io::Result<()> {
        let format = SkipListFormat::builder()
            .with_kind(SkipListKind::Pair)
            .with_reference_compress(true)
            .build();
        let mut writer = BufferedSkipListWriter::new(format);
        for i in 0..11u32 {
            writer.add_pair_item(1000 + i, i * 2)?;
        }
        let finished = writer.finish_flush()?;
        assert_eq!(finished.compress_mode(), CompressMode::Reference);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_wrong_arity_panics() {
        let mut writer = BufferedSkipListWriter::new(tri_format());
        let _ = writer.add_pair_item(1, 1);
    }
}
