use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use redis::{AsyncCommands, Client as RedisClient};

use crate::errors::AuthError;

const ACCESS_DENY_PREFIX: &str = "access_deny";

/// Token ids revoked at sign-out, remembered until the token would have expired.
#[derive(Clone)]
pub struct TokenDenylist {
    redis: Option<RedisClient>,
    local: Arc<DashMap<String, i64>>,
}

impl TokenDenylist {
    pub fn new(redis: Option<RedisClient>) -> Self {
        TokenDenylist {
            redis,
            local: Arc::new(DashMap::new()),
        }
    }

    fn key(jti: &str) -> String {
        format!("{ACCESS_DENY_PREFIX}:{jti}")
    }

    /// Revokes `jti` until the unix timestamp `expires_at`.
    pub async fn revoke(&self, jti: &str, expires_at: i64) -> Result<(), AuthError> {
        let ttl = expires_at - Utc::now().timestamp();
        if ttl <= 0 {
            return Ok(());
        }

        match &self.redis {
            Some(client) => {
                let mut conn = client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| AuthError::Revocation(e.to_string()))?;
                let _: () = conn
                    .set_ex(Self::key(jti), 1, ttl as u64)
                    .await
                    .map_err(|e| AuthError::Revocation(e.to_string()))?;
            }
            None => {
                self.local.insert(jti.to_string(), expires_at);
            }
        }
        Ok(())
    }

    pub async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        match &self.redis {
            Some(client) => {
                let mut conn = client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| AuthError::Revocation(e.to_string()))?;
                conn.exists(Self::key(jti))
                    .await
                    .map_err(|e| AuthError::Revocation(e.to_string()))
            }
            None => {
                let now = Utc::now().timestamp();
                self.local.retain(|_, expires_at| *expires_at > now);
                Ok(self.local.contains_key(jti))
            }
        }
    }
}
