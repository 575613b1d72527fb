use std::io::{self, Read, Write};

/// Minimum number of bits able to hold `max_value`.
pub fn compute_num_bits(max_value: u32) -> u8 {
    (32 - max_value.leading_zeros()) as u8
}

pub fn packed_len(count: usize, num_bits: u8) -> usize {
    (count * num_bits as usize + 7) / 8
}

/// Packs values LSB first, each truncated to `num_bits` bits.
pub struct BitPacker {
    mini_buffer: u64,
    mini_buffer_written: u32,
    num_bits: u8,
    mask: u64,
    written_bytes: usize,
}

pub struct BitUnpacker {
    mini_buffer: u64,
    mini_buffer_len: u32,
    num_bits: u8,
    mask: u64,
}

fn low_bits_mask(num_bits: u8) -> u64 {
    (1u64 << num_bits) - 1
}

impl BitPacker {
    pub fn new(num_bits: u8) -> Self {
        debug_assert!(num_bits <= 32);
        Self {
            mini_buffer: 0,
            mini_buffer_written: 0,
            num_bits,
            mask: low_bits_mask(num_bits),
            written_bytes: 0,
        }
    }

    pub fn write<W: Write + ?Sized>(&mut self, value: u32, writer: &mut W) -> io::Result<()> {
        if self.num_bits == 0 {
            return Ok(());
        }
        self.mini_buffer |= (value as u64 & self.mask) << self.mini_buffer_written;
        self.mini_buffer_written += self.num_bits as u32;
        while self.mini_buffer_written >= 8 {
            writer.write_all(&[self.mini_buffer as u8])?;
            self.written_bytes += 1;
            self.mini_buffer >>= 8;
            self.mini_buffer_written -= 8;
        }
        Ok(())
    }

    /// Writes the pending partial byte, returns the total packed length.
    pub fn close<W: Write + ?Sized>(mut self, writer: &mut W) -> io::Result<usize> {
        if self.mini_buffer_written > 0 {
            writer.write_all(&[self.mini_buffer as u8])?;
            self.written_bytes += 1;
        }
        Ok(self.written_bytes)
    }
}

impl BitUnpacker {
    pub fn new(num_bits: u8) -> io::Result<Self> {
        if num_bits > 32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bit width {} out of range", num_bits),
            ));
        }
        Ok(Self {
            mini_buffer: 0,
            mini_buffer_len: 0,
            num_bits,
            mask: low_bits_mask(num_bits),
        })
    }

    /// Reads exactly `count` values. Trailing bits of the last byte are dropped.
    pub fn read_all<R: Read>(
        mut self,
        reader: &mut R,
        count: usize,
        output: &mut Vec<u32>,
    ) -> io::Result<()> {
        output.reserve(count);
        for _ in 0..count {
            while self.mini_buffer_len < self.num_bits as u32 {
                let mut byte = [0u8; 1];
                reader.read_exact(&mut byte)?;
                self.mini_buffer |= (byte[0] as u64) << self.mini_buffer_len;
                self.mini_buffer_len += 8;
            }
            output.push((self.mini_buffer & self.mask) as u32);
            self.mini_buffer >>= self.num_bits;
            self.mini_buffer_len -= self.num_bits as u32;
        }
        Ok(())
    }
}
