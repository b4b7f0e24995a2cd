mod error;
mod handler;
mod router;

pub use error::{ApiError, recover_error};
pub use handler::{ApiResponse, health};
pub use router::routes;
