use std::sync::Arc;

use actix_web::web;

use crate::comment::service::CommentService;
use crate::config::AppConfig;
use crate::database::{SessionRegistry, Stores};
use crate::middleware::auth::JwtConfig;
use crate::post::post_service::PostService;
use crate::router::index::routes;
use crate::user::service::UserService;

/// Shared services, built once and cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    user_service: web::Data<UserService>,
    post_service: web::Data<PostService>,
    comment_service: web::Data<CommentService>,
    jwt: web::Data<JwtConfig>,
    sessions: Option<web::Data<dyn SessionRegistry>>,
}

impl AppState {
    /// Without `sessions`, bearer tokens are checked as JWTs only.
    pub fn new(
        config: &AppConfig,
        stores: Stores,
        sessions: Option<Arc<dyn SessionRegistry>>,
    ) -> Self {
        let user_service = UserService::new(stores.users.clone(), config.admin_email.clone())
            .with_hash_cost(config.bcrypt_cost);

        AppState {
            user_service: web::Data::new(user_service),
            post_service: web::Data::new(PostService::new(stores.posts.clone())),
            comment_service: web::Data::new(CommentService::new(
                stores.comments.clone(),
                stores.posts.clone(),
            )),
            jwt: web::Data::new(JwtConfig::new(
                config.jwt_secret.clone(),
                config.session_ttl_hours,
            )),
            sessions: sessions.map(web::Data::from),
        }
    }

    /// Register services and every route on an app.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.user_service.clone())
            .app_data(self.post_service.clone())
            .app_data(self.comment_service.clone())
            .app_data(self.jwt.clone());

        if let Some(sessions) = &self.sessions {
            cfg.app_data(sessions.clone());
        }

        cfg.configure(routes);
    }
}
