use async_trait::async_trait;
use log::info;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

/// Server-side record of live session tokens, consulted on every
/// authenticated request.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Register `token` for `user_id`, replacing any earlier session.
    async fn store_session(
        &self,
        user_id: &str,
        token: &str,
        expiry_seconds: u64,
    ) -> Result<(), String>;

    /// User id the token belongs to, if the session is still live
    async fn validate_session(&self, token: &str) -> Result<Option<String>, String>;

    async fn invalidate_session(&self, user_id: &str) -> Result<(), String>;
}

/// Session registry backed by Redis. A token is only honoured while
/// `token:<token>` still maps to its user.
#[derive(Clone)]
pub struct RedisService {
    connection: MultiplexedConnection,
}

impl RedisService {
    pub async fn connect(redis_url: &str) -> Result<Self, String> {
        let client =
            Client::open(redis_url).map_err(|e| format!("Failed to create Redis client: {}", e))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| format!("Failed to connect to Redis: {}", e))?;

        info!("Connected successfully to Redis");

        Ok(Self { connection })
    }

    pub async fn get_session(&self, user_id: &str) -> Result<Option<String>, String> {
        let mut conn = self.connection.clone();
        let key = format!("session:{}", user_id);

        conn.get(&key)
            .await
            .map_err(|e| format!("Failed to get session: {}", e))
    }
}

#[async_trait]
impl SessionRegistry for RedisService {
    async fn store_session(
        &self,
        user_id: &str,
        token: &str,
        expiry_seconds: u64,
    ) -> Result<(), String> {
        let mut conn = self.connection.clone();

        // A new sign-in replaces the previous session
        self.invalidate_session(user_id).await?;

        let key = format!("session:{}", user_id);
        conn.set_ex::<_, _, ()>(&key, token, expiry_seconds)
            .await
            .map_err(|e| format!("Failed to store session: {}", e))?;

        let token_key = format!("token:{}", token);
        conn.set_ex::<_, _, ()>(&token_key, user_id, expiry_seconds)
            .await
            .map_err(|e| format!("Failed to store token mapping: {}", e))?;

        Ok(())
    }

    async fn validate_session(&self, token: &str) -> Result<Option<String>, String> {
        let mut conn = self.connection.clone();
        let token_key = format!("token:{}", token);

        conn.get(&token_key)
            .await
            .map_err(|e| format!("Failed to validate session: {}", e))
    }

    /// Invalidate a user's session (logout)
    async fn invalidate_session(&self, user_id: &str) -> Result<(), String> {
        let mut conn = self.connection.clone();
        let session_key = format!("session:{}", user_id);

        if let Some(token) = self.get_session(user_id).await? {
            let token_key = format!("token:{}", token);
            conn.del::<_, ()>(&token_key)
                .await
                .map_err(|e| format!("Failed to delete token: {}", e))?;
        }

        conn.del::<_, ()>(&session_key)
            .await
            .map_err(|e| format!("Failed to delete session: {}", e))?;

        Ok(())
    }
}
