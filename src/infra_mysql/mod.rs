mod catalog_mysql;
mod relation_store_mysql;
mod wishlist_store_mysql;

pub use catalog_mysql::*;
pub use relation_store_mysql::*;
pub use wishlist_store_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;
