/// A word of an index as supplied by the build and query paths, before hashing.
///
/// A term without a word is the null term: the indexed field is absent from the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    index_name: String,
    word: Option<String>,
}

impl Term {
    pub fn new(index_name: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            word: Some(word.into()),
        }
    }

    pub fn null(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            word: None,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.word.is_none()
    }
}
