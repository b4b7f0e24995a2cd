mod auth_service_fake;
mod friendship_service_impl;
mod wishlist_service_impl;

pub use auth_service_fake::*;
pub use friendship_service_impl::*;
pub use wishlist_service_impl::*;
