#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexType {
    Text,
    String,
    Number,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashFunction {
    #[default]
    Xxh3,
    Xxh64,
}

/// Parameters of the hash turning a word into its dictionary key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DictHashParams {
    pub function: HashFunction,
    pub seed: u64,
}

#[derive(Clone, Debug)]
pub struct IndexConfig {
    name: String,
    index_type: IndexType,
    dict_hash_params: DictHashParams,
    shard_count: Option<usize>,
}

pub struct IndexConfigBuilder {
    name: String,
    index_type: IndexType,
    dict_hash_params: DictHashParams,
    shard_count: Option<usize>,
}

impl IndexConfig {
    pub fn builder(name: impl Into<String>, index_type: IndexType) -> IndexConfigBuilder {
        IndexConfigBuilder {
            name: name.into(),
            index_type,
            dict_hash_params: DictHashParams::default(),
            shard_count: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    pub fn dict_hash_params(&self) -> DictHashParams {
        self.dict_hash_params
    }

    pub fn is_number_index(&self) -> bool {
        self.index_type == IndexType::Number
    }

    pub fn shard_count(&self) -> Option<usize> {
        self.shard_count
    }

    pub fn is_sharded(&self) -> bool {
        self.shard_count.map_or(false, |count| count > 0)
    }
}

impl IndexConfigBuilder {
    pub fn with_dict_hash_params(mut self, dict_hash_params: DictHashParams) -> Self {
        self.dict_hash_params = dict_hash_params;
        self
    }

    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = Some(shard_count);
        self
    }

    pub fn build(self) -> IndexConfig {
        IndexConfig {
            name: self.name,
            index_type: self.index_type,
            dict_hash_params: self.dict_hash_params,
            shard_count: self.shard_count,
        }
    }
}
