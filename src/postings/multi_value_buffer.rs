/// One `u32` column of a buffered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicValue {
    Key,
    Value1,
    Value2,
}

/// Column schema of a [`MultiValueBuffer`], fixed once the buffer is created.
#[derive(Debug, Clone, Default)]
pub struct MultiValue {
    atomic_values: Vec<AtomicValue>,
}

/// Column-major row buffer, `capacity` rows at most.
pub struct MultiValueBuffer {
    columns: Vec<Vec<u32>>,
    multi_value: MultiValue,
    capacity: usize,
    len: usize,
}

impl MultiValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atomic_values(atomic_values: Vec<AtomicValue>) -> Self {
        Self { atomic_values }
    }

    pub fn add_atomic_value(&mut self, atomic_value: AtomicValue) {
        self.atomic_values.push(atomic_value);
    }

    pub fn atomic_value_count(&self) -> usize {
        self.atomic_values.len()
    }

    pub fn atomic_values(&self) -> &[AtomicValue] {
        &self.atomic_values
    }
}

impl MultiValueBuffer {
    pub fn new(multi_value: MultiValue, capacity: usize) -> Self {
        let columns = (0..multi_value.atomic_value_count())
            .map(|_| Vec::with_capacity(capacity))
            .collect();
        Self {
            columns,
            multi_value,
            capacity,
            len: 0,
        }
    }

    /// Sets `column` of the row under construction.
    pub fn push(&mut self, column: usize, value: u32) {
        let values = &mut self.columns[column];
        debug_assert_eq!(values.len(), self.len);
        values.push(value);
    }

    /// Completes the row under construction, every column must have been pushed.
    pub fn end_push(&mut self) {
        debug_assert!(self.columns.iter().all(|c| c.len() == self.len + 1));
        debug_assert!(self.len < self.capacity);
        self.len += 1;
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.len = 0;
    }

    pub fn column(&self, column: usize) -> &[u32] {
        &self.columns[column][..self.len]
    }

    pub fn multi_value(&self) -> &MultiValue {
        &self.multi_value
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }
}
