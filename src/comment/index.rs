use super::controller::{
    create_comment, delete_comment, edit_comment, get_all_comments, get_post_comments,
    like_comment,
};
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    let auth = || HttpAuthentication::bearer(verify_token);

    cfg.service(
        web::scope("/comment")
            .route("/get-comments/{post_id}", web::get().to(get_post_comments))
            .service(
                web::resource("/create")
                    .wrap(auth())
                    .route(web::post().to(create_comment)),
            )
            .service(
                web::resource("/getAllComments")
                    .wrap(auth())
                    .route(web::get().to(get_all_comments)),
            )
            .service(
                web::resource("/likeComment/{comment_id}")
                    .wrap(auth())
                    .route(web::put().to(like_comment)),
            )
            .service(
                web::resource("/editComment/{comment_id}")
                    .wrap(auth())
                    .route(web::put().to(edit_comment)),
            )
            .service(
                web::resource("/deleteComment/{comment_id}")
                    .wrap(auth())
                    .route(web::delete().to(delete_comment)),
            ),
    );
}
