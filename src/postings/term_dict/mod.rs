mod term_dict;

pub use term_dict::{TermDict, TermDictBuilder};
