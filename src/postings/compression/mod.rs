mod bit_packer;
mod pfor_delta;
mod reference;
mod short_list;

use std::io::{self, Read, Write};

pub use bit_packer::{compute_num_bits, BitPacker, BitUnpacker};
pub use pfor_delta::PforDeltaEncoder;
pub use reference::ReferenceEncoder;
pub use short_list::ShortListEncoder;

use crate::MAX_UNCOMPRESSED_SKIP_LIST_SIZE;

/// Largest block any codec accepts, the item count is stored in one byte.
pub const MAX_BLOCK_LEN: usize = u8::MAX as usize;

/// Integer block codec. The discriminants are written to disk.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressMode {
    PforDelta = 0,
    ShortList = 1,
    Reference = 2,
}

impl CompressMode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> io::Result<Self> {
        match value {
            0 => Ok(CompressMode::PforDelta),
            1 => Ok(CompressMode::ShortList),
            2 => Ok(CompressMode::Reference),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown compress mode tag {}", value),
            )),
        }
    }

    pub fn encode_u32<W: Write + ?Sized>(self, values: &[u32], writer: &mut W) -> io::Result<usize> {
        match self {
            CompressMode::PforDelta => PforDeltaEncoder.encode(values, writer),
            CompressMode::ShortList => ShortListEncoder.encode(values, writer),
            CompressMode::Reference => ReferenceEncoder.encode(values, writer),
        }
    }

    /// Decodes one block and appends it to `output`.
    ///
    /// Short lists carry no header so `short_list_len` values are read; the
    /// other codecs read their item count from the block itself.
    pub fn decode_u32<R: Read>(
        self,
        reader: &mut R,
        short_list_len: usize,
        output: &mut Vec<u32>,
    ) -> io::Result<usize> {
        match self {
            CompressMode::PforDelta => PforDeltaEncoder.decode(reader, output),
            CompressMode::ShortList => ShortListEncoder.decode(reader, short_list_len, output),
            CompressMode::Reference => ReferenceEncoder.decode(reader, output),
        }
    }

    /// Exact number of bytes [`encode_u32`](Self::encode_u32) writes for `values`.
    pub fn encoded_len(self, values: &[u32]) -> usize {
        match self {
            CompressMode::PforDelta => PforDeltaEncoder.encoded_len(values),
            CompressMode::ShortList => ShortListEncoder.encoded_len(values),
            CompressMode::Reference => ReferenceEncoder.encoded_len(values),
        }
    }
}

pub fn get_skip_list_compress_mode(item_count: usize) -> CompressMode {
    if item_count <= MAX_UNCOMPRESSED_SKIP_LIST_SIZE {
        CompressMode::ShortList
    } else {
        CompressMode::PforDelta
    }
}

fn check_block_len(len: usize) -> io::Result<u8> {
    u8::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("block of {} values exceeds {}", len, MAX_BLOCK_LEN),
        )
    })
}
