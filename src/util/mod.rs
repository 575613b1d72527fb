mod capacity_policy;
mod thread_pool;

pub use capacity_policy::{
    CapacityPolicy, FixedCapacityPolicy, FractionalCapacityPolicy, FractionalChunkCapacityPolicy,
    SKIP_LIST_SLICE_CAPACITY,
};
pub use thread_pool::{panic_message, ThreadPool};
