use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::comment::model::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};
use crate::comment::service::CommentService;
use crate::middleware::auth::session_user;
use crate::utils::error::CustomError;
use crate::utils::pagination::{PageOptions, PageQuery};
use crate::utils::response;
use crate::utils::validation::parse_object_id;

/// Create a new comment on a post
/// POST /api/comment/create
pub async fn create_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let author = session_user(&req)?;

    if let Some(claimed) = body.user_id.as_deref() {
        if parse_object_id(claimed, "user ID")? != author.id {
            return Err(CustomError::ForbiddenError(
                "You are not allowed to create this comment".to_string(),
            ));
        }
    }

    let post_id = parse_object_id(&body.post_id, "post ID")?;

    let comment = comment_service
        .add_comment(&author, post_id, &body.content)
        .await?;

    Ok(response::created(
        "Comment created successfully",
        json!({ "comment": CommentResponse::from(&comment) }),
    ))
}

/// Get all comments for a post, newest first
/// GET /api/comment/get-comments/{postId}
pub async fn get_post_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post ID")?;

    let comments: Vec<CommentResponse> = comment_service
        .get_comments_for_post(&post_id)
        .await?
        .iter()
        .map(CommentResponse::from)
        .collect();

    Ok(response::ok(
        "Comments retrieved successfully",
        json!({
            "count": comments.len(),
            "comments": comments,
        }),
    ))
}

/// Admin dashboard listing
/// GET /api/comment/getAllComments?startIndex=&limit=&sort=
pub async fn get_all_comments(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let caller = session_user(&req)?;

    let page = comment_service
        .get_all_comments(&caller, PageOptions::from(query.into_inner()))
        .await?;
    let comments: Vec<CommentResponse> = page.comments.iter().map(CommentResponse::from).collect();

    Ok(response::ok(
        "Comments retrieved successfully",
        json!({
            "comments": comments,
            "totalComments": page.total_comments,
            "lastMonthComments": page.last_month_comments,
        }),
    ))
}

/// PUT /api/comment/likeComment/{commentId}
pub async fn like_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user = session_user(&req)?;
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;

    let comment = comment_service.like_comment(&comment_id, &user).await?;

    Ok(response::ok(
        "Comment like toggled",
        json!({
            "numberOfLikes": comment.number_of_likes(),
            "comment": CommentResponse::from(&comment),
        }),
    ))
}

/// PUT /api/comment/editComment/{commentId}
pub async fn edit_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
    body: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let editor = session_user(&req)?;
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;

    let comment = comment_service
        .edit_comment(&comment_id, &editor, &body.content)
        .await?;

    Ok(response::ok(
        "Comment updated successfully",
        json!({ "comment": CommentResponse::from(&comment) }),
    ))
}

/// DELETE /api/comment/deleteComment/{commentId}
pub async fn delete_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let caller = session_user(&req)?;
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;

    comment_service.delete_comment(&comment_id, &caller).await?;

    Ok(response::ok("Comment has been deleted", json!({})))
}
