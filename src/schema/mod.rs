mod index_config;

pub use index_config::{
    DictHashParams, HashFunction, IndexConfig, IndexConfigBuilder, IndexType,
};
