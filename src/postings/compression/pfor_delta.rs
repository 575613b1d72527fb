//! Patched frame of reference.
//!
//! `[count u8][num bits u8][exception count u8][packed low bits]` followed by
//! one `(index u8, vint high bits)` pair per value not fitting in `num bits`.
//! Delta computation is left to the caller, values are stored as given.

use std::io::{self, Read, Write};

use tantivy_common::{BinarySerializable, VInt};

use super::{
    bit_packer::{compute_num_bits, packed_len, BitPacker, BitUnpacker},
    check_block_len,
};

pub struct PforDeltaEncoder;

const HEADER_LEN: usize = 3;

fn vint_len(value: u64) -> usize {
    let mut buf = [0u8; 10];
    VInt(value).serialize_into(&mut buf)
}

fn high_bits(value: u32, num_bits: u8) -> u64 {
    (value as u64) >> num_bits
}

/// Picks the width minimizing packed bytes plus exception bytes.
fn select_num_bits(values: &[u32]) -> (u8, usize) {
    let max_bits = values.iter().map(|&v| compute_num_bits(v)).max().unwrap_or(0);
    let mut best = (max_bits, packed_len(values.len(), max_bits));
    for num_bits in 0..max_bits {
        let mut cost = packed_len(values.len(), num_bits);
        for &value in values {
            if compute_num_bits(value) > num_bits {
                cost += 1 + vint_len(high_bits(value, num_bits));
            }
        }
        if cost < best.1 {
            best = (num_bits, cost);
        }
    }
    best
}

impl PforDeltaEncoder {
    pub fn encode<W: Write + ?Sized>(&self, values: &[u32], writer: &mut W) -> io::Result<usize> {
        let count = check_block_len(values.len())?;
        let (num_bits, _) = select_num_bits(values);
        let exceptions: Vec<(u8, u64)> = values
            .iter()
            .enumerate()
            .filter(|(_, &value)| compute_num_bits(value) > num_bits)
            .map(|(idx, &value)| (idx as u8, high_bits(value, num_bits)))
            .collect();

        writer.write_all(&[count, num_bits, exceptions.len() as u8])?;
        let mut packer = BitPacker::new(num_bits);
        for &value in values {
            packer.write(value, writer)?;
        }
        let mut written = HEADER_LEN + packer.close(writer)?;
        for (idx, high) in exceptions {
            writer.write_all(&[idx])?;
            let mut buf = [0u8; 10];
            let len = VInt(high).serialize_into(&mut buf);
            writer.write_all(&buf[..len])?;
            written += 1 + len;
        }
        Ok(written)
    }

    pub fn decode<R: Read>(&self, reader: &mut R, output: &mut Vec<u32>) -> io::Result<usize> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header)?;
        let [count, num_bits, exception_count] = header;
        let start = output.len();
        BitUnpacker::new(num_bits)?.read_all(reader, count as usize, output)?;
        for _ in 0..exception_count {
            let mut idx = [0u8; 1];
            reader.read_exact(&mut idx)?;
            let high = VInt::deserialize(reader)?.val();
            let slot = output.get_mut(start + idx[0] as usize).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "exception index out of block")
            })?;
            *slot = ((high << num_bits) | *slot as u64) as u32;
        }
        Ok(count as usize)
    }

    pub fn encoded_len(&self, values: &[u32]) -> usize {
        HEADER_LEN + select_num_bits(values).1
    }
}
