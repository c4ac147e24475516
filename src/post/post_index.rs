use super::post_controller::{create_post, delete_post, get_post, get_posts};
use crate::middleware::auth::verify_token;
use actix_web::{guard, web};
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    let auth = || HttpAuthentication::bearer(verify_token);

    cfg.service(
        web::scope("/post")
            .route("/getposts", web::get().to(get_posts))
            // Guarded so a POST to /create is not caught as a post id
            .service(
                web::resource("/{id}")
                    .guard(guard::Get())
                    .route(web::get().to(get_post)),
            )
            .service(
                web::resource("/create")
                    .wrap(auth())
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/deletepost/{id}")
                    .wrap(auth())
                    .route(web::delete().to(delete_post)),
            ),
    );
}
