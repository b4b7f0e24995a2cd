mod catalog_fake;
mod memory_db;
mod relation_store_memory;
mod wishlist_store_memory;

pub use catalog_fake::*;
pub use memory_db::{MemoryDb, MemoryTx};
pub use relation_store_memory::*;
pub use wishlist_store_memory::*;
