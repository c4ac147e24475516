use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};

use blog_comments::AppState;
use blog_comments::config::{AppConfig, StorageBackend};
use blog_comments::database::{RedisService, SessionRegistry, Stores, connect_to_mongo};
use blog_comments::middleware::error_handler::handle_error;
use blog_comments::middleware::not_found::not_found;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let stores = match config.storage {
        StorageBackend::Mongo => {
            let db = connect_to_mongo(&config.mongodb_uri, &config.database_name)
                .await
                .map_err(std::io::Error::other)?;
            Stores::mongo(&db)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Stores::memory()
        }
    };

    let redis = match &config.redis_url {
        Some(url) => match RedisService::connect(url).await {
            Ok(service) => Some(Arc::new(service) as Arc<dyn SessionRegistry>),
            Err(e) => {
                warn!("{}; continuing with JWT-only sessions", e);
                None
            }
        },
        None => None,
    };

    let state = AppState::new(&config, stores, redis);

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
