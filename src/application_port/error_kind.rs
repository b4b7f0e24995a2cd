use serde::Serialize;

/// Transport-independent classification of every service error.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Conflict,
    StorageFailure,
}
