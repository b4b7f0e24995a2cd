mod auth_service;
mod error_kind;
mod friendship_service;
mod wishlist_service;

pub use auth_service::*;
pub use error_kind::*;
pub use friendship_service::*;
pub use wishlist_service::*;
