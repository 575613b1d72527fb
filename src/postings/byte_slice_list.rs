//! Append-only chain of fixed-capacity byte buffers.
//!
//! A list starts out [`Writable`]: slices may only be appended to its tail.
//! [`ByteSliceList::seal`] turns it into a [`Sealed`] list, the only state from
//! which a [`ByteSliceListIterator`] can be created, so reading never overlaps
//! with writing.

use std::{
    io::{self, Write},
    marker::PhantomData,
    ptr::NonNull,
};

use allocator_api2::{
    alloc::{Allocator, Global},
    vec::Vec as AllocVec,
};

use crate::util::{CapacityPolicy, FractionalChunkCapacityPolicy};

pub struct Writable;
pub struct Sealed;

pub struct ByteSlice<A: Allocator = Global> {
    data: AllocVec<u8, A>,
    capacity: usize,
    next: Option<NonNull<ByteSlice<A>>>,
}

/// Slices are linked through raw pointers to leaked boxes, freed when the
/// list is dropped.
pub struct ByteSliceList<S = Writable, A: Allocator + Clone = Global> {
    head: Option<NonNull<ByteSlice<A>>>,
    tail: Option<NonNull<ByteSlice<A>>>,
    total_size: usize,
    slice_count: usize,
    allocator: A,
    _state: PhantomData<S>,
}

pub type SealedByteSliceList<A = Global> = ByteSliceList<Sealed, A>;

// A linked slice is only reachable through the list owning it.
unsafe impl<A: Allocator + Send> Send for ByteSlice<A> {}
unsafe impl<A: Allocator + Sync> Sync for ByteSlice<A> {}
unsafe impl<S, A: Allocator + Clone + Send> Send for ByteSliceList<S, A> {}
unsafe impl<A: Allocator + Clone + Sync> Sync for ByteSliceList<Sealed, A> {}

pub struct ByteSliceListIterator<'a, A: Allocator = Global> {
    total_size: usize,
    end_pos: usize,
    seeked_slice_size: usize,
    pos_in_slice: usize,
    slice: Option<&'a ByteSlice<A>>,
}

pub struct ByteSliceWriter<
    C: CapacityPolicy = FractionalChunkCapacityPolicy,
    A: Allocator + Clone = Global,
> {
    byte_slice_list: ByteSliceList<Writable, A>,
    current_slice: Option<ByteSlice<A>>,
    capacity_policy: C,
}

impl<A: Allocator> ByteSlice<A> {
    pub fn new_in(capacity: usize, allocator: A) -> Self {
        Self {
            data: AllocVec::with_capacity_in(capacity, allocator),
            capacity,
            next: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_full(&self) -> bool {
        self.size() == self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn next(&self) -> Option<&ByteSlice<A>> {
        self.next.map(|next| unsafe { next.as_ref() })
    }

    /// Copies as much of `buf` as fits, returns the number of bytes copied.
    pub fn write_data(&mut self, buf: &[u8]) -> usize {
        let size = std::cmp::min(self.capacity - self.size(), buf.len());
        self.data.extend_from_slice(&buf[..size]);
        size
    }
}

impl ByteSliceList<Writable, Global> {
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl Default for ByteSliceList<Writable, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator + Clone> ByteSliceList<Writable, A> {
    pub fn new_in(allocator: A) -> Self {
        Self {
            head: None,
            tail: None,
            total_size: 0,
            slice_count: 0,
            allocator,
            _state: PhantomData,
        }
    }

    /// Creates an empty slice backed by this list's allocator, not linked yet.
    pub fn allocate_slice(&self, capacity: usize) -> ByteSlice<A> {
        ByteSlice::new_in(capacity, self.allocator.clone())
    }

    /// Appends `slice` to the tail in O(1). The slice is not modified afterwards.
    pub fn add(&mut self, mut slice: ByteSlice<A>) {
        slice.next = None;
        self.total_size += slice.size();
        self.slice_count += 1;

        let slice = NonNull::from(Box::leak(Box::new(slice)));
        match self.tail {
            Some(mut tail) => unsafe { tail.as_mut().next = Some(slice) },
            None => self.head = Some(slice),
        }
        self.tail = Some(slice);
    }

    pub fn seal(mut self) -> ByteSliceList<Sealed, A> {
        ByteSliceList {
            head: self.head.take(),
            tail: self.tail.take(),
            total_size: self.total_size,
            slice_count: self.slice_count,
            allocator: self.allocator.clone(),
            _state: PhantomData,
        }
    }
}

impl<S, A: Allocator + Clone> ByteSliceList<S, A> {
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn slice_count(&self) -> usize {
        self.slice_count
    }

    pub fn head(&self) -> Option<&ByteSlice<A>> {
        self.head.map(|head| unsafe { head.as_ref() })
    }
}

impl<A: Allocator + Clone> ByteSliceList<Sealed, A> {
    pub fn iter(&self) -> ByteSliceListIterator<'_, A> {
        ByteSliceListIterator::new(self)
    }

    /// Writes every byte of the list to `writer`, slice by slice.
    pub fn dump<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut slice = self.head();
        while let Some(current) = slice {
            writer.write_all(current.data())?;
            slice = current.next();
        }
        Ok(self.total_size)
    }
}

impl<S, A: Allocator + Clone> Drop for ByteSliceList<S, A> {
    fn drop(&mut self) {
        self.tail = None;
        let mut slice = self.head.take();
        while let Some(current) = slice {
            let current = unsafe { Box::from_raw(current.as_ptr()) };
            slice = current.next;
        }
    }
}

impl<'a, A: Allocator + Clone> ByteSliceListIterator<'a, A> {
    pub fn new(byte_slice_list: &'a ByteSliceList<Sealed, A>) -> Self {
        Self {
            total_size: byte_slice_list.total_size(),
            end_pos: 0,
            seeked_slice_size: 0,
            pos_in_slice: 0,
            slice: byte_slice_list.head(),
        }
    }
}

impl<'a, A: Allocator> ByteSliceListIterator<'a, A> {
    pub fn position(&self) -> usize {
        self.seeked_slice_size + self.pos_in_slice
    }

    /// Moves the cursor forward to `begin_pos`.
    ///
    /// Returns false, leaving the cursor untouched, if `begin_pos` is behind
    /// the cursor or not inside the list.
    pub fn seek_slice(&mut self, begin_pos: usize) -> bool {
        if begin_pos < self.position() || begin_pos >= self.total_size {
            return false;
        }

        let mut seeked_slice_size = self.seeked_slice_size;
        let mut slice = self.slice;
        while let Some(current) = slice {
            let slice_end_pos = seeked_slice_size + current.size();
            if begin_pos < slice_end_pos {
                self.slice = Some(current);
                self.seeked_slice_size = seeked_slice_size;
                self.pos_in_slice = begin_pos - seeked_slice_size;
                return true;
            }
            seeked_slice_size = slice_end_pos;
            slice = current.next();
        }
        false
    }

    /// True iff the cursor is before `end_pos` and `end_pos` is inside the list.
    /// Sets the bound used by the following [`next`](Self::next) calls.
    pub fn has_next(&mut self, end_pos: usize) -> bool {
        if self.slice.is_none() || end_pos > self.total_size {
            return false;
        }
        self.end_pos = end_pos;
        self.position() < end_pos
    }

    /// Returns the longest contiguous run of the current slice not crossing the
    /// bound given to [`has_next`](Self::has_next).
    ///
    /// Must only be called after `has_next` returned true.
    pub fn next(&mut self) -> &'a [u8] {
        debug_assert!(self.position() < self.end_pos);
        let Some(slice) = self.slice else {
            return &[];
        };
        let slice_end_pos = self.seeked_slice_size + slice.size();
        let data = &slice.data()[self.pos_in_slice..];
        if self.end_pos >= slice_end_pos {
            self.seeked_slice_size = slice_end_pos;
            self.pos_in_slice = 0;
            self.slice = slice.next();
            data
        } else {
            let len = self.end_pos - self.position();
            self.pos_in_slice += len;
            &data[..len]
        }
    }
}

impl<C: CapacityPolicy + Default> ByteSliceWriter<C, Global> {
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<C: CapacityPolicy + Default> Default for ByteSliceWriter<C, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CapacityPolicy + Default, A: Allocator + Clone> ByteSliceWriter<C, A> {
    pub fn new_in(allocator: A) -> Self {
        Self {
            byte_slice_list: ByteSliceList::new_in(allocator),
            current_slice: None,
            capacity_policy: C::default(),
        }
    }
}

impl<C: CapacityPolicy, A: Allocator + Clone> ByteSliceWriter<C, A> {
    pub fn total_size(&self) -> usize {
        self.byte_slice_list.total_size() + self.current_slice.as_ref().map_or(0, |s| s.size())
    }

    /// Links the partially filled tail slice and seals the list.
    pub fn into_sealed(mut self) -> ByteSliceList<Sealed, A> {
        if let Some(slice) = self.current_slice.take() {
            if slice.size() > 0 {
                self.byte_slice_list.add(slice);
            }
        }
        self.byte_slice_list.seal()
    }

    fn add_slice(&mut self) {
        let current_capacity = self.current_slice.as_ref().map_or(0, |s| s.capacity());
        let next_capacity = self.capacity_policy.next_capacity(current_capacity);
        assert!(next_capacity > 0);
        if let Some(full_slice) = self.current_slice.take() {
            self.byte_slice_list.add(full_slice);
        }
        self.current_slice = Some(self.byte_slice_list.allocate_slice(next_capacity));
    }
}

impl<C: CapacityPolicy, A: Allocator + Clone> Write for ByteSliceWriter<C, A> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.current_slice.as_ref().map_or(true, |s| s.is_full()) {
            self.add_slice();
        }
        match self.current_slice.as_mut() {
            Some(slice) => Ok(slice.write_data(buf)),
            None => Ok(0),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
