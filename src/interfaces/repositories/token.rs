use jsonwebtoken::TokenData;
use uuid::Uuid;

use crate::{
    entities::{token::{Claims, RefreshClaims}, user::User},
    errors::AuthError,
};

pub trait TokenServiceRepository: Send + Sync {
    /// Creates a new access token for the user
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Creates a new refresh token for the user
    fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError>;

    /// Decodes an access token and returns its claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;

    /// Decodes a refresh token and returns its claims
    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError>;
}
