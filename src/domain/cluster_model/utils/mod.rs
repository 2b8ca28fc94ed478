pub mod entity_pool;
pub mod id;
