use std::{
    io::{self, Read, Write},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::compression::CompressMode;

/// Dictionary record of one term: where its skip list and doc list live in
/// the posting file and what is needed to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermInfo {
    pub df: u32,
    pub total_tf: u64,
    pub skip_item_count: u32,
    pub skip_compress_mode: CompressMode,
    pub skip_offset: u64,
    pub skip_len: u32,
    pub posting_offset: u64,
    pub posting_len: u32,
}

impl TermInfo {
    pub const SERIALIZED_LEN: usize = 4 + 8 + 4 + 1 + 8 + 4 + 8 + 4;

    pub fn skip_range(&self) -> Range<usize> {
        self.skip_offset as usize..(self.skip_offset + self.skip_len as u64) as usize
    }

    pub fn posting_range(&self) -> Range<usize> {
        self.posting_offset as usize..(self.posting_offset + self.posting_len as u64) as usize
    }

    pub fn serialize<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.df)?;
        writer.write_u64::<LittleEndian>(self.total_tf)?;
        writer.write_u32::<LittleEndian>(self.skip_item_count)?;
        writer.write_u8(self.skip_compress_mode.as_u8())?;
        writer.write_u64::<LittleEndian>(self.skip_offset)?;
        writer.write_u32::<LittleEndian>(self.skip_len)?;
        writer.write_u64::<LittleEndian>(self.posting_offset)?;
        writer.write_u32::<LittleEndian>(self.posting_len)?;
        Ok(())
    }

    pub fn serialize_into_vec(&self, buffer: &mut Vec<u8>) {
        buffer.reserve(Self::SERIALIZED_LEN);
        buffer.extend_from_slice(&self.df.to_le_bytes());
        buffer.extend_from_slice(&self.total_tf.to_le_bytes());
        buffer.extend_from_slice(&self.skip_item_count.to_le_bytes());
        buffer.push(self.skip_compress_mode.as_u8());
        buffer.extend_from_slice(&self.skip_offset.to_le_bytes());
        buffer.extend_from_slice(&self.skip_len.to_le_bytes());
        buffer.extend_from_slice(&self.posting_offset.to_le_bytes());
        buffer.extend_from_slice(&self.posting_len.to_le_bytes());
    }

    pub fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            df: reader.read_u32::<LittleEndian>()?,
            total_tf: reader.read_u64::<LittleEndian>()?,
            skip_item_count: reader.read_u32::<LittleEndian>()?,
            skip_compress_mode: CompressMode::from_u8(reader.read_u8()?)?,
            skip_offset: reader.read_u64::<LittleEndian>()?,
            skip_len: reader.read_u32::<LittleEndian>()?,
            posting_offset: reader.read_u64::<LittleEndian>()?,
            posting_len: reader.read_u32::<LittleEndian>()?,
        })
    }
}
