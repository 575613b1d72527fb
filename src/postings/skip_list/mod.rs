mod buffered_skip_list_writer;
mod skip_list_decoder;
mod skip_list_format;

pub use buffered_skip_list_writer::{BufferedSkipListWriter, FinishedSkipList};
pub use skip_list_decoder::{SkipListDecoder, SkipListEntry, TrailingValues};
pub use skip_list_format::{SkipListFormat, SkipListFormatBuilder, SkipListKind};
