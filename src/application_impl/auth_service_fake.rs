use crate::application_port::*;
use crate::domain_model::UserId;

#[derive(Debug)]
pub struct FakeAuthService;

impl FakeAuthService {
    pub fn new() -> Self {
        Self
    }

    pub fn token_for(user: UserId) -> String {
        format!("fake-access-token:{user}")
    }
}

// Accepts any token of the form `fake-access-token:<user id>`.
// Token minting and expiry live with the account subsystem.
#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let id = token
            .strip_prefix("fake-access-token:")
            .ok_or(AuthError::TokenInvalid)?;
        match id.parse::<UserId>() {
            Ok(user) if user.0 != 0 => Ok(user),
            _ => Err(AuthError::TokenInvalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_round_trips_user_id() {
        let auth = FakeAuthService::new();

        let user = auth
            .verify_token(&FakeAuthService::token_for(UserId(42)))
            .await
            .unwrap();

        assert_eq!(user, UserId(42));
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let auth = FakeAuthService::new();

        for token in ["", "fake-access-token:", "fake-access-token:abc", "fake-access-token:0", "Bearer 1"] {
            let err = auth.verify_token(token).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized, "token {token:?}");
        }
    }
}
