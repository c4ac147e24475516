use std::env;

/// Where documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("STORAGE must be 'mongo' or 'memory', got '{}'", other)),
        }
    }
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub mongodb_uri: String,
    pub database_name: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub admin_email: Option<String>,
    pub bcrypt_cost: u32,
}

const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

impl AppConfig {
    /// Load configuration from the process environment (call `dotenv()` first)
    pub fn from_env() -> Result<Self, String> {
        let storage = StorageBackend::parse(
            &env::var("STORAGE").unwrap_or_else(|_| "mongo".to_string()),
        )?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if storage == StorageBackend::Memory => DEV_JWT_SECRET.to_string(),
            _ => return Err("JWT_SECRET is required".to_string()),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| "PORT must be a valid number")?,
            storage,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "rust_blogdb".to_string()),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| "SESSION_TTL_HOURS must be a valid number")?,
            admin_email: env::var("ADMIN_EMAIL")
                .ok()
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .map(|cost| cost.parse().map_err(|_| "BCRYPT_COST must be a valid number"))
                .transpose()?
                .unwrap_or(bcrypt::DEFAULT_COST),
        })
    }
}

/// Name reported in every response envelope
pub fn service_name() -> String {
    env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string())
}
