use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use redis::{AsyncCommands, Client as RedisClient};

use crate::constants::{CONTACT_EMAIL_LIMIT, CONTACT_EMAIL_WINDOW_SECS};

/// Fixed window counter
#[derive(Debug)]
struct FixedWindow {
    window_size: Duration,
    limit: u32,
    started: Instant,
    count: u32,
}

impl FixedWindow {
    fn new(window_size: Duration, limit: u32) -> Self {
        Self {
            window_size,
            limit,
            started: Instant::now(),
            count: 0,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.window_size
    }

    fn allow(&mut self) -> bool {
        let now = Instant::now();
        if self.is_expired(now) {
            self.started = now;
            self.count = 0;
        }

        if self.count < self.limit {
            self.count += 1;
            true
        } else {
            false
        }
    }
}

/// Caps contact submissions per sender address.
///
/// Counters live in Redis when a client is configured so the limit holds
/// across instances; otherwise a per-process map is used. A Redis failure
/// lets the submission through.
#[derive(Clone)]
pub struct ContactRateLimiter {
    redis: Option<RedisClient>,
    local: Arc<DashMap<String, Arc<Mutex<FixedWindow>>>>,
    limit: u32,
    window: Duration,
}

impl ContactRateLimiter {
    pub fn new(redis: Option<RedisClient>) -> Self {
        Self::with_limit(redis, CONTACT_EMAIL_LIMIT, Duration::from_secs(CONTACT_EMAIL_WINDOW_SECS))
    }

    pub fn with_limit(redis: Option<RedisClient>, limit: u32, window: Duration) -> Self {
        Self {
            redis,
            local: Arc::new(DashMap::new()),
            limit,
            window,
        }
    }

    fn key(email: &str) -> String {
        format!("rl:email:{}", urlencoding::encode(&email.trim().to_lowercase()))
    }

    /// Counts one submission for `email` and reports whether it is allowed.
    pub async fn check(&self, email: &str) -> bool {
        let key = Self::key(email);

        if let Some(client) = &self.redis {
            match self.check_redis(client, &key).await {
                Ok(allowed) => return allowed,
                Err(e) => {
                    tracing::warn!(error = %e, "Rate limit store unavailable, allowing submission");
                    return true;
                }
            }
        }

        self.check_local(key)
    }

    async fn check_redis(&self, client: &RedisClient, key: &str) -> redis::RedisResult<bool> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let count: u32 = conn.incr(key, 1).await?;
        if count == 1 {
            let _: () = conn.expire(key, self.window.as_secs() as i64).await?;
        }
        Ok(count <= self.limit)
    }

    fn check_local(&self, key: String) -> bool {
        let now = Instant::now();
        self.local.retain(|_, window| !window.lock().is_expired(now));

        let window = self
            .local
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(FixedWindow::new(self.window, self.limit))))
            .clone();
        let allowed = window.lock().allow();
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn two_messages_per_address_then_blocked() {
        let limiter = ContactRateLimiter::new(None);

        assert!(limiter.check("ana@example.com").await);
        assert!(limiter.check("ana@example.com").await);
        assert!(!limiter.check("ana@example.com").await);
        assert!(limiter.check("ben@example.com").await);
    }

    #[actix_rt::test]
    async fn address_case_and_padding_share_a_counter() {
        let limiter = ContactRateLimiter::with_limit(None, 1, Duration::from_secs(60));

        assert!(limiter.check("Ana@Example.com").await);
        assert!(!limiter.check("  ana@example.com ").await);
    }

    #[actix_rt::test]
    async fn counter_resets_after_the_window() {
        let limiter = ContactRateLimiter::with_limit(None, 1, Duration::from_millis(20));

        assert!(limiter.check("ana@example.com").await);
        assert!(!limiter.check("ana@example.com").await);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check("ana@example.com").await);
    }

    #[test]
    fn keys_are_url_encoded() {
        assert_eq!(ContactRateLimiter::key("a+b@x.io"), "rl:email:a%2Bb%40x.io");
    }
}
