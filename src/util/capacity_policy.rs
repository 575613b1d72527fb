/// Decides the capacity of the next slice appended to a byte slice list.
pub trait CapacityPolicy {
    /// `current` is the capacity of the tail slice, `0` when the list is empty.
    fn next_capacity(&self, current: usize) -> usize;
}

#[derive(Default, Clone, Copy)]
pub struct FixedCapacityPolicy<const C: usize = SKIP_LIST_SLICE_CAPACITY>;

impl<const C: usize> CapacityPolicy for FixedCapacityPolicy<C> {
    fn next_capacity(&self, _current: usize) -> usize {
        C
    }
}

/// Grows each slice by a quarter of the previous one, starting at `I` and
/// capped at `H`.
#[derive(Default, Clone, Copy)]
pub struct FractionalCapacityPolicy<const I: usize, const H: usize>;

impl<const I: usize, const H: usize> CapacityPolicy for FractionalCapacityPolicy<I, H> {
    fn next_capacity(&self, current: usize) -> usize {
        if current == 0 {
            I
        } else {
            std::cmp::min(current + (current >> 2), H)
        }
    }
}

pub const SKIP_LIST_SLICE_CAPACITY: usize = 256;
pub const FRACTIONAL_CAPACITY_INIT_SIZE: usize = 128;
pub const FRACTIONAL_CAPACITY_CHUNK_SIZE: usize = 10 * 1024 * 1024;
pub type FractionalChunkCapacityPolicy =
    FractionalCapacityPolicy<FRACTIONAL_CAPACITY_INIT_SIZE, FRACTIONAL_CAPACITY_CHUNK_SIZE>;
