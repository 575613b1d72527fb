use std::io;

use crate::util::FixedCapacityPolicy;

use super::{
    compression::CompressMode, ByteSliceWriter, MultiValue, MultiValueBuffer, SealedByteSliceList,
};

/// Rows buffered in a [`MultiValueBuffer`] and flushed, one encoded block per
/// column, into a byte slice list.
pub struct BufferedByteSlice {
    multi_value_buffer: MultiValueBuffer,
    byte_slice_writer: ByteSliceWriter<FixedCapacityPolicy>,
    flushed_count: usize,
}

impl BufferedByteSlice {
    pub fn new(multi_value: MultiValue, buffer_capacity: usize) -> Self {
        Self {
            multi_value_buffer: MultiValueBuffer::new(multi_value, buffer_capacity),
            byte_slice_writer: ByteSliceWriter::new(),
            flushed_count: 0,
        }
    }

    pub fn multi_value_buffer(&self) -> &MultiValueBuffer {
        &self.multi_value_buffer
    }

    pub fn multi_value(&self) -> &MultiValue {
        self.multi_value_buffer.multi_value()
    }

    pub fn push(&mut self, column: usize, value: u32) {
        self.multi_value_buffer.push(column, value);
    }

    /// Returns true once the buffer is full and must be flushed.
    pub fn end_push(&mut self) -> bool {
        self.multi_value_buffer.end_push();
        self.need_flush()
    }

    pub fn need_flush(&self) -> bool {
        self.multi_value_buffer.is_full()
    }

    /// Encodes the buffered rows column by column, returns the encoded length.
    pub fn flush(&mut self, compress_mode: CompressMode) -> io::Result<usize> {
        if self.multi_value_buffer.is_empty() {
            return Ok(0);
        }
        let mut encoded_len = 0;
        for column in 0..self.multi_value().atomic_value_count() {
            let values = self.multi_value_buffer.column(column);
            encoded_len += compress_mode.encode_u32(values, &mut self.byte_slice_writer)?;
        }
        self.flushed_count += self.multi_value_buffer.len();
        self.multi_value_buffer.clear();
        Ok(encoded_len)
    }

    /// Bytes a [`flush`](Self::flush) with `compress_mode` would add now.
    pub fn estimate_flush_size(&self, compress_mode: CompressMode) -> usize {
        (0..self.multi_value().atomic_value_count())
            .map(|column| compress_mode.encoded_len(self.multi_value_buffer.column(column)))
            .sum()
    }

    pub fn total_count(&self) -> usize {
        self.flushed_count + self.multi_value_buffer.len()
    }

    pub fn flushed_count(&self) -> usize {
        self.flushed_count
    }

    pub fn flushed_size(&self) -> usize {
        self.byte_slice_writer.total_size()
    }

    /// Seals the flushed bytes. Rows still buffered are discarded.
    pub fn into_sealed(self) -> SealedByteSliceList {
        debug_assert!(self.multi_value_buffer.is_empty());
        self.byte_slice_writer.into_sealed()
    }
}
