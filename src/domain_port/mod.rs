// collaborator

mod catalog;

pub use catalog::*;

// store

mod relation_store;
mod wishlist_store;

mod repo_tx;

pub use relation_store::*;
pub use wishlist_store::*;

pub use repo_tx::*;
