mod app;
mod friend;
mod invitation;
mod user;
mod wishlist;

pub use app::*;
pub use friend::*;
pub use invitation::*;
pub use user::*;
pub use wishlist::*;
