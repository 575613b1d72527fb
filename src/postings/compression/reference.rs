//! Frame of reference: `[count u8][base u32 LE][num bits u8][packed value - base]`.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{
    bit_packer::{compute_num_bits, packed_len, BitPacker, BitUnpacker},
    check_block_len,
};

pub struct ReferenceEncoder;

const HEADER_LEN: usize = 6;

fn base_and_num_bits(values: &[u32]) -> (u32, u8) {
    let base = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    (base, compute_num_bits(max - base))
}

impl ReferenceEncoder {
    pub fn encode<W: Write + ?Sized>(&self, values: &[u32], writer: &mut W) -> io::Result<usize> {
        let count = check_block_len(values.len())?;
        let (base, num_bits) = base_and_num_bits(values);
        writer.write_u8(count)?;
        writer.write_u32::<LittleEndian>(base)?;
        writer.write_u8(num_bits)?;
        let mut packer = BitPacker::new(num_bits);
        for &value in values {
            packer.write(value - base, writer)?;
        }
        Ok(HEADER_LEN + packer.close(writer)?)
    }

    pub fn decode<R: Read>(&self, reader: &mut R, output: &mut Vec<u32>) -> io::Result<usize> {
        let count = reader.read_u8()? as usize;
        let base = reader.read_u32::<LittleEndian>()?;
        let num_bits = reader.read_u8()?;
        let start = output.len();
        BitUnpacker::new(num_bits)?.read_all(reader, count, output)?;
        for value in &mut output[start..] {
            *value = value.wrapping_add(base);
        }
        Ok(count)
    }

    pub fn encoded_len(&self, values: &[u32]) -> usize {
        let (_, num_bits) = base_and_num_bits(values);
        HEADER_LEN + packed_len(values.len(), num_bits)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::ReferenceEncoder;

    #[test]
    fn test_absolute_keys() -> io::Result<()> {
        let values: Vec<u32> = (0..32).map(|v| 1_000_000 + v * 3).collect();
        let mut buf = vec![];
        ReferenceEncoder.encode(&values, &mut buf)?;
        assert_eq!(buf[0], 32);
        assert_eq!(&buf[1..5], &1_000_000u32.to_le_bytes());
        assert_eq!(buf[5], 7);
        assert_eq!(buf.len(), 6 + 28);

        let mut decoded = vec![];
        assert_eq!(ReferenceEncoder.decode(&mut &buf[..], &mut decoded)?, 32);
        assert_eq!(decoded, values);
        Ok(())
    }

    #[test]
    fn test_constant_block() -> io::Result<()> {
        let values = vec![42u32; 5];
        let mut buf = vec![];
        assert_eq!(ReferenceEncoder.encode(&values, &mut buf)?, 6);
        let mut decoded = vec![];
        ReferenceEncoder.decode(&mut &buf[..], &mut decoded)?;
        assert_eq!(decoded, values);
        Ok(())
    }
}
