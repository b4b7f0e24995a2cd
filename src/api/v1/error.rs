use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use std::convert::Infallible;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(err) = err.find::<ApiError>() {
        (err.code(), err.message.clone())
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("malformed body: {e}"))
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, format!("malformed query: {e}"))
    } else if err.find::<reject::UnsupportedMediaType>().is_some()
        || err.find::<reject::LengthRequired>().is_some()
        || err.find::<reject::PayloadTooLarge>().is_some()
    {
        (StatusCode::BAD_REQUEST, "unsupported request body".to_string())
    } else if let Some(e) = err.find::<reject::MissingHeader>() {
        (StatusCode::UNAUTHORIZED, e.to_string())
    } else if err.is_not_found() || err.find::<reject::MethodNotAllowed>().is_some() {
        // a wrong method on a known path also lands here as 404
        (StatusCode::NOT_FOUND, "route not found".to_string())
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
        )
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, code))
}

/// Rejection carrying an already classified service error.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn classify<E: std::fmt::Display>(kind: ErrorKind, error: E) -> Self {
        if kind == ErrorKind::StorageFailure {
            warn!("Internal error: {}", error);
            Self::new(kind, "internal error")
        } else {
            Self::new(kind, error.to_string())
        }
    }
}

impl reject::Reject for ApiError {}

impl From<RelationError> for ApiError {
    fn from(error: RelationError) -> Self {
        ApiError::classify(error.kind(), error)
    }
}

impl From<WishlistError> for ApiError {
    fn from(error: WishlistError) -> Self {
        ApiError::classify(error.kind(), error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::classify(error.kind(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::AppId;

    #[test]
    fn kinds_map_to_envelope_codes() {
        let cases = [
            (ApiError::from(RelationError::SelfInvite), 400),
            (ApiError::from(RelationError::DuplicateInvitation), 400),
            (ApiError::from(RelationError::NotReceiver), 401),
            (ApiError::from(RelationError::InvitationNotFound), 404),
            (ApiError::from(WishlistError::NotInWishlist(AppId(1))), 404),
            (ApiError::from(AuthError::TokenInvalid), 401),
        ];

        for (error, code) in cases {
            assert_eq!(error.code().as_u16(), code, "{error:?}");
        }
    }

    #[test]
    fn storage_details_are_hidden() {
        let error = ApiError::from(WishlistError::Store("connection reset by peer".into()));

        assert_eq!(error.code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "internal error");
    }
}
