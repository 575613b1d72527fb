mod buffered_byte_slice;
mod byte_slice_list;
pub mod compression;
mod multi_value_buffer;
mod persistent_posting_iterator;
mod posting_encoder;
mod posting_iterator;
pub mod skip_list;
mod term_dict;
mod term_info;

pub use buffered_byte_slice::BufferedByteSlice;
pub use byte_slice_list::{
    ByteSlice, ByteSliceList, ByteSliceListIterator, ByteSliceWriter, Sealed, SealedByteSliceList,
    Writable,
};
pub use multi_value_buffer::{AtomicValue, MultiValue, MultiValueBuffer};
pub use persistent_posting_iterator::PersistentPostingIterator;
pub use posting_encoder::{EncodedPosting, PostingEncoder};
pub use posting_iterator::{
    collect_postings, PostingIterator, RangePostingIterator, VecPostingIterator,
};
pub use term_dict::{TermDict, TermDictBuilder};
pub use term_info::TermInfo;
