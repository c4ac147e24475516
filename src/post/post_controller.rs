use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::middleware::auth::session_user;
use crate::post::post_model::{CreatePostRequest, PostResponse};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::pagination::{PageOptions, PageQuery};
use crate::utils::response;
use crate::utils::validation::parse_object_id;

pub async fn create_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    post: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    // Author comes from token
    let author = session_user(&req)?;

    let inserted_post = post_service.create_post(&author, post.into_inner()).await?;

    Ok(response::created(
        "Post created successfully",
        json!({ "post": PostResponse::from(&inserted_post) }),
    ))
}

pub async fn get_posts(
    post_service: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let (posts, total) = post_service
        .get_posts(PageOptions::from(query.into_inner()))
        .await?;
    let posts: Vec<PostResponse> = posts.iter().map(PostResponse::from).collect();

    Ok(response::ok(
        "Posts fetched successfully",
        json!({
            "posts": posts,
            "totalPosts": total,
        }),
    ))
}

pub async fn get_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&post_id.into_inner(), "post ID")?;
    let post = post_service.get_post(&post_id).await?;

    Ok(response::ok(
        "Post fetched successfully",
        json!({ "post": PostResponse::from(&post) }),
    ))
}

pub async fn delete_post(
    req: HttpRequest,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let caller = session_user(&req)?;
    let post_id = parse_object_id(&post_id.into_inner(), "post ID")?;

    post_service.delete_post(&caller, &post_id).await?;

    Ok(response::ok("Post deleted successfully", json!({})))
}
