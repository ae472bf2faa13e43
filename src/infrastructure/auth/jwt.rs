use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, TokenData, Validation};
use uuid::Uuid;

use crate::entities::token::{Claims, RefreshClaims, TokenType};
use crate::entities::user::User;
use crate::errors::AuthError;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
    refresh_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
            refresh_expiration: Duration::days(config.refresh_token_exp_days),
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            admin: user.is_admin,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
            exp: (now + self.access_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(AuthError::from)
    }

    fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Refresh,
            exp: (now + self.refresh_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.refresh_encoding).map_err(AuthError::from)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &Self::validation())?;
        if data.claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }

    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        let data = decode::<RefreshClaims>(token, &self.keys.refresh_decoding, &Self::validation())?;
        if data.claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(&AppConfig {
            jwt_secret: "a".repeat(40),
            refresh_token_secret: "b".repeat(40),
            ..AppConfig::default()
        })
    }

    fn user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            password_hash: String::new(),
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_carries_identity_and_admin_flag() {
        let jwt = service();
        let owner = user(true);
        let token = jwt.create_jwt(&owner).unwrap();

        let claims = jwt.decode_jwt(&token).unwrap().claims;
        assert_eq!(claims.sub, owner.id.to_string());
        assert!(claims.admin);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn every_token_gets_its_own_jti() {
        let jwt = service();
        let owner = user(false);
        let a = jwt.decode_jwt(&jwt.create_jwt(&owner).unwrap()).unwrap().claims;
        let b = jwt.decode_jwt(&jwt.create_jwt(&owner).unwrap()).unwrap().claims;
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let jwt = service();
        let refresh = jwt.create_refresh_jwt(&Uuid::new_v4()).unwrap();
        assert!(jwt.decode_jwt(&refresh).is_err());
        assert!(jwt.decode_refresh_jwt(&refresh).is_ok());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = JwtService {
            access_expiration: Duration::minutes(-5),
            ..service()
        };
        let token = jwt.create_jwt(&user(true)).unwrap();
        assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::TokenExpired)));
    }
}
