//! Uncompressed little endian `u32` values, no header.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub struct ShortListEncoder;

impl ShortListEncoder {
    pub fn encode<W: Write + ?Sized>(&self, values: &[u32], writer: &mut W) -> io::Result<usize> {
        for &value in values {
            writer.write_u32::<LittleEndian>(value)?;
        }
        Ok(self.encoded_len(values))
    }

    pub fn decode<R: Read>(
        &self,
        reader: &mut R,
        count: usize,
        output: &mut Vec<u32>,
    ) -> io::Result<usize> {
        for _ in 0..count {
            output.push(reader.read_u32::<LittleEndian>()?);
        }
        Ok(count)
    }

    pub fn encoded_len(&self, values: &[u32]) -> usize {
        values.len() * std::mem::size_of::<u32>()
    }
}
