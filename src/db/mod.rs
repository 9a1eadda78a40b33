pub mod artifact;
pub mod catalog;
pub mod redis;

pub use artifact::load_similarity_index;
pub use catalog::MetadataTable;
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use self::redis::CacheWriterHandle;
