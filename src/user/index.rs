use super::controller::{get_user, sign_in, sign_out, sign_up};
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(sign_up))
            .route("/signin", web::post().to(sign_in))
            .service(
                web::resource("/signout")
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::post().to(sign_out)),
            ),
    );
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/user").route("/{user_id}", web::get().to(get_user)));
}
