use crate::application_port::ErrorKind;
use crate::domain_model::UserId;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InternalError(_) => ErrorKind::StorageFailure,
            _ => ErrorKind::Unauthorized,
        }
    }
}

/// Identity collaborator. Turns a bearer token into the acting user; the
/// relationship core trusts the returned id without re-checking credentials.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError>;
}
