use std::io;

use crate::postings::compression::CompressMode;

use super::{SkipListFormat, SkipListKind};

/// Values needed to rebuild the row omitted from a trimmed three column short list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingValues {
    /// Absolute `value1` of the last row.
    pub last_value1: u32,
    /// Sum of the whole `value2` column.
    pub value2_total: u64,
}

/// One decoded row, keys and `value1` made absolute again.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipListEntry {
    pub key: u32,
    pub value1: u32,
    pub value2: u32,
}

pub struct SkipListDecoder {
    format: SkipListFormat,
}

impl SkipListDecoder {
    pub fn new(format: SkipListFormat) -> Self {
        Self { format }
    }

    /// Decodes `item_count` rows dumped by a finished skip list.
    ///
    /// `trailing` is required for a trimmed short list.
    pub fn decode(
        &self,
        data: &[u8],
        item_count: usize,
        compress_mode: CompressMode,
        trailing: Option<TrailingValues>,
    ) -> io::Result<Vec<SkipListEntry>> {
        if item_count == 0 {
            return Ok(vec![]);
        }
        let column_count = self.format.column_count();
        let row_capacity = item_count.min(data.len() / (column_count * 4) + 1);
        let mut columns: Vec<Vec<u32>> = vec![Vec::with_capacity(row_capacity); column_count];
        let mut reader = data;

        if compress_mode == CompressMode::ShortList {
            let trimmed = column_count == 3;
            for (idx, column) in columns.iter_mut().enumerate() {
                let len = if trimmed && idx > 0 {
                    item_count - 1
                } else {
                    item_count
                };
                compress_mode.decode_u32(&mut reader, len, column)?;
            }
            if trimmed {
                let trailing = trailing.ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "trimmed skip list needs trailing values",
                    )
                })?;
                restore_trailing(&mut columns, trailing)?;
            }
        } else {
            while columns[0].len() < item_count {
                let mut block_len = 0;
                for column in columns.iter_mut() {
                    block_len = compress_mode.decode_u32(&mut reader, 0, column)?;
                }
                if block_len == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "empty skip list block",
                    ));
                }
            }
            if columns[0].len() != item_count {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "skip list holds {} rows, expected {}",
                        columns[0].len(),
                        item_count
                    ),
                ));
            }
        }

        self.to_entries(&columns, item_count)
    }

    fn to_entries(&self, columns: &[Vec<u32>], item_count: usize) -> io::Result<Vec<SkipListEntry>> {
        let mut entries = Vec::with_capacity(item_count);
        let mut last = SkipListEntry::default();
        for i in 0..item_count {
            let entry = match self.format.kind() {
                SkipListKind::Single => SkipListEntry {
                    key: 0,
                    value1: columns[0][i],
                    value2: 0,
                },
                SkipListKind::Pair => SkipListEntry {
                    key: if self.format.is_reference_compress() {
                        columns[0][i]
                    } else {
                        accumulate(last.key, columns[0][i])?
                    },
                    value1: accumulate(last.value1, columns[1][i])?,
                    value2: 0,
                },
                SkipListKind::Tri => SkipListEntry {
                    key: accumulate(last.key, columns[0][i])?,
                    value1: accumulate(last.value1, columns[1][i])?,
                    value2: columns[2][i],
                },
            };
            entries.push(entry);
            last = entry;
        }
        Ok(entries)
    }
}

fn accumulate(base: u32, delta: u32) -> io::Result<u32> {
    base.checked_add(delta).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "skip list value overflows u32")
    })
}

fn restore_trailing(columns: &mut [Vec<u32>], trailing: TrailingValues) -> io::Result<()> {
    let value1_prefix: u64 = columns[1].iter().map(|&v| v as u64).sum();
    let value2_prefix: u64 = columns[2].iter().map(|&v| v as u64).sum();
    let value1_delta = (trailing.last_value1 as u64)
        .checked_sub(value1_prefix)
        .and_then(|delta| u32::try_from(delta).ok());
    let value2 = trailing
        .value2_total
        .checked_sub(value2_prefix)
        .and_then(|value| u32::try_from(value).ok());
    let (Some(value1_delta), Some(value2)) = (value1_delta, value2) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "trailing values do not match decoded prefix",
        ));
    };
    columns[1].push(value1_delta);
    columns[2].push(value2);
    Ok(())
}
