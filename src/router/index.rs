use crate::comment::index::comment_routes;
use crate::config::service_name;
use crate::post::post_index::post_routes;
use crate::user::index::{auth_routes, user_routes};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

#[get("/")]
async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Blog API is running",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(welcome);
    cfg.service(
        web::scope("/api")
            .configure(auth_routes)
            .configure(user_routes)
            .configure(post_routes)
            .configure(comment_routes),
    );
}
