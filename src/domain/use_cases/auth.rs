use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::revocation::TokenDenylist;
use crate::entities::token::{AuthResponse, Claims};
use crate::entities::user::{LoginUser, NewUser, NewUserResponse, PublicUser, User};
use crate::errors::{AppError, AuthError};
use crate::repositories::token::TokenServiceRepository;
use crate::repositories::user::UserRepository;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
    pub denylist: TokenDenylist,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T, denylist: TokenDenylist) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            denylist,
        }
    }

    /// Creates the site owner's account. Only the very first account can be
    /// registered and it becomes the administrator.
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;

        if self.user_repo.count_users().await? > 0 {
            return Err(AppError::ForbiddenAccess("Registration is closed".into()));
        }

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password, true);
        let id = self.user_repo.create_user(&user_insert).await?;

        tracing::info!(user_id = %id, "Administrator account created");
        Ok(NewUserResponse {
            id,
            message: "User created successfully".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self
            .user_repo
            .get_user_by_email(&request.email)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid =
            verify_password(&request.password, &user.password_hash).map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user).map_err(|e| {
            tracing::warn!("Failed to create JWT: {}", e);
            AuthError::TokenCreation
        })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id).map_err(|e| {
            tracing::warn!("Failed to create refresh JWT: {}", e);
            AuthError::TokenCreation
        })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Issues a new token pair. The used refresh token is revoked.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.decode_refresh_jwt(token)?.claims;
        if self.denylist.is_revoked(&claims.jti).await? {
            return Err(AuthError::TokenRevoked);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;
        let user = self
            .user_repo
            .get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let response = self.create_auth_response(&user)?;
        self.denylist.revoke(&claims.jti, claims.exp as i64).await?;
        Ok(response)
    }

    /// Revokes the access token described by `claims` and, when given, the
    /// refresh token too.
    pub async fn logout(&self, claims: &Claims, refresh_token: Option<&str>) -> Result<(), AuthError> {
        self.denylist.revoke(&claims.jti, claims.exp as i64).await?;

        if let Some(token) = refresh_token {
            let refresh = self.token_service.decode_refresh_jwt(token)?.claims;
            if refresh.sub != claims.sub {
                return Err(AuthError::InvalidToken);
            }
            self.denylist.revoke(&refresh.jti, refresh.exp as i64).await?;
        }

        tracing::info!(user_id = %claims.sub, "User logged out");
        Ok(())
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<PublicUser, AppError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidInput("Invalid user id".into()))?;
        self.user_repo
            .get_user_by_id(&user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Decodes an access token and rejects it when it has been revoked.
    pub async fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.token_service.decode_jwt(token)?.claims;
        if self.denylist.is_revoked(&claims.jti).await? {
            return Err(AuthError::TokenRevoked);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtService;
    use crate::repositories::memory::MemoryUserRepo;
    use crate::settings::AppConfig;

    const PASSWORD: &str = "Sunset#Harbor42";

    fn handler() -> AuthHandler<MemoryUserRepo, JwtService> {
        let config = AppConfig {
            jwt_secret: "a".repeat(40),
            refresh_token_secret: "b".repeat(40),
            ..AppConfig::default()
        };
        AuthHandler::new(MemoryUserRepo::new(), JwtService::new(&config), TokenDenylist::new(None))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password: PASSWORD.into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginUser {
        LoginUser {
            email: email.into(),
            password: password.into(),
        }
    }

    #[actix_rt::test]
    async fn first_account_is_admin_and_registration_then_closes() {
        let auth = handler();
        auth.register(new_user("Owner@Example.com")).await.unwrap();

        let err = auth.register(new_user("intruder@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::ForbiddenAccess(_)));

        let tokens = auth.login(login("owner@example.com", PASSWORD)).await.unwrap();
        let claims = auth.authenticate(&tokens.access_token).await.unwrap();
        assert!(claims.admin);
        assert_eq!(claims.email, "owner@example.com");
    }

    #[actix_rt::test]
    async fn wrong_password_is_rejected() {
        let auth = handler();
        auth.register(new_user("owner@example.com")).await.unwrap();

        let err = auth.login(login("owner@example.com", "Wrong#Pass99")).await.unwrap_err();
        assert!(matches!(err, AuthError::WrongCredentials));
    }

    #[actix_rt::test]
    async fn logout_revokes_both_tokens() {
        let auth = handler();
        auth.register(new_user("owner@example.com")).await.unwrap();
        let tokens = auth.login(login("owner@example.com", PASSWORD)).await.unwrap();
        let claims = auth.authenticate(&tokens.access_token).await.unwrap();

        auth.logout(&claims, Some(&tokens.refresh_token)).await.unwrap();

        assert!(matches!(auth.authenticate(&tokens.access_token).await, Err(AuthError::TokenRevoked)));
        assert!(matches!(auth.refresh_token(&tokens.refresh_token).await, Err(AuthError::TokenRevoked)));
    }

    #[actix_rt::test]
    async fn refresh_tokens_are_single_use() {
        let auth = handler();
        auth.register(new_user("owner@example.com")).await.unwrap();
        let tokens = auth.login(login("owner@example.com", PASSWORD)).await.unwrap();

        let renewed = auth.refresh_token(&tokens.refresh_token).await.unwrap();
        assert!(auth.authenticate(&renewed.access_token).await.is_ok());
        assert!(auth.refresh_token(&tokens.refresh_token).await.is_err());
    }

    #[actix_rt::test]
    async fn weak_password_fails_validation() {
        let auth = handler();
        let err = auth
            .register(NewUser { email: "owner@example.com".into(), password: "password".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
