use crate::postings::{AtomicValue, MultiValue};

/// Column layout of a skip list row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SkipListKind {
    /// `value1`, stored as a running sum.
    Single,
    /// `key`, `value1`.
    Pair,
    /// `key`, `value1`, `value2`.
    #[default]
    Tri,
}

#[derive(Debug, Default, Clone)]
pub struct SkipListFormat {
    kind: SkipListKind,
    reference_compress: bool,
}

#[derive(Default)]
pub struct SkipListFormatBuilder {
    kind: SkipListKind,
    reference_compress: bool,
}

impl SkipListFormatBuilder {
    pub fn with_kind(mut self, kind: SkipListKind) -> Self {
        self.kind = kind;
        self
    }

    /// Stores pair keys verbatim and compresses blocks with the reference codec.
    pub fn with_reference_compress(mut self, reference_compress: bool) -> Self {
        self.reference_compress = reference_compress;
        self
    }

    pub fn build(self) -> SkipListFormat {
        SkipListFormat {
            kind: self.kind,
            reference_compress: self.reference_compress,
        }
    }
}

impl SkipListFormat {
    pub fn builder() -> SkipListFormatBuilder {
        SkipListFormatBuilder::default()
    }

    pub fn kind(&self) -> SkipListKind {
        self.kind
    }

    pub fn is_reference_compress(&self) -> bool {
        self.reference_compress
    }

    pub fn column_count(&self) -> usize {
        match self.kind {
            SkipListKind::Single => 1,
            SkipListKind::Pair => 2,
            SkipListKind::Tri => 3,
        }
    }

    pub fn multi_value(&self) -> MultiValue {
        let atomic_values = match self.kind {
            SkipListKind::Single => vec![AtomicValue::Value1],
            SkipListKind::Pair => vec![AtomicValue::Key, AtomicValue::Value1],
            SkipListKind::Tri => vec![AtomicValue::Key, AtomicValue::Value1, AtomicValue::Value2],
        };
        MultiValue::with_atomic_values(atomic_values)
    }
}
