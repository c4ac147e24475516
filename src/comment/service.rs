use std::sync::Arc;

use chrono::{Duration, Utc};
use log::debug;
use mongodb::bson::oid::ObjectId;

use crate::comment::model::{Comment, CommentPage, validate_content};
use crate::comment::repository::CommentStore;
use crate::middleware::auth::SessionUser;
use crate::post::post_repository::PostStore;
use crate::utils::error::CustomError;
use crate::utils::pagination::PageOptions;

pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    posts: Arc<dyn PostStore>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>, posts: Arc<dyn PostStore>) -> Self {
        CommentService { comments, posts }
    }

    /// Add a new comment to a post
    pub async fn add_comment(
        &self,
        author: &SessionUser,
        post_id: ObjectId,
        content: &str,
    ) -> Result<Comment, CustomError> {
        let content = validate_content(content)?;

        if self.posts.find_by_id(&post_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }

        let comment = self
            .comments
            .insert(Comment::new(post_id, author.id, content))
            .await?;
        debug!("comment {:?} added to post {}", comment.id, post_id);
        Ok(comment)
    }

    /// Comments for a post, newest first
    pub async fn get_comments_for_post(
        &self,
        post_id: &ObjectId,
    ) -> Result<Vec<Comment>, CustomError> {
        self.comments.find_by_post(post_id).await
    }

    /// Dashboard listing over every post; admins only
    pub async fn get_all_comments(
        &self,
        caller: &SessionUser,
        page: PageOptions,
    ) -> Result<CommentPage, CustomError> {
        caller.require_admin()?;

        let comments = self.comments.find_page(page).await?;
        let total_comments = self.comments.count(None).await?;
        let one_month_ago = Utc::now() - Duration::days(30);
        let last_month_comments = self.comments.count(Some(one_month_ago)).await?;

        Ok(CommentPage {
            comments,
            total_comments,
            last_month_comments,
        })
    }

    pub async fn get_comment_by_id(&self, comment_id: &ObjectId) -> Result<Comment, CustomError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))
    }

    /// Toggle the caller in the comment's like set
    pub async fn like_comment(
        &self,
        comment_id: &ObjectId,
        user: &SessionUser,
    ) -> Result<Comment, CustomError> {
        self.comments
            .toggle_like(comment_id, &user.id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))
    }

    /// Update a comment (only author can update)
    pub async fn edit_comment(
        &self,
        comment_id: &ObjectId,
        editor: &SessionUser,
        content: &str,
    ) -> Result<Comment, CustomError> {
        let comment = self.get_comment_by_id(comment_id).await?;
        if comment.user_id != editor.id {
            return Err(CustomError::ForbiddenError(
                "You are not allowed to edit this comment".to_string(),
            ));
        }

        let content = validate_content(content)?;

        self.comments
            .update_content(comment_id, &content, Utc::now())
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))
    }

    /// Delete a comment (author or admin)
    pub async fn delete_comment(
        &self,
        comment_id: &ObjectId,
        caller: &SessionUser,
    ) -> Result<(), CustomError> {
        let comment = self.get_comment_by_id(comment_id).await?;
        if comment.user_id != caller.id && !caller.is_admin() {
            return Err(CustomError::ForbiddenError(
                "You are not allowed to delete this comment".to_string(),
            ));
        }

        if !self.comments.delete(comment_id).await? {
            return Err(CustomError::NotFoundError("Comment not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::post::post_model::Post;
    use crate::user::model::Role;

    struct Fixture {
        service: CommentService,
        post_id: ObjectId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let post = PostStore::insert(
            store.as_ref(),
            Post {
                id: None,
                title: "Post".into(),
                content: "Body".into(),
                author_id: ObjectId::new(),
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .unwrap();

        Fixture {
            service: CommentService::new(store.clone(), store),
            post_id: post.id.unwrap(),
        }
    }

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: ObjectId::new(),
            role,
        }
    }

    #[tokio::test]
    async fn rejects_overlong_and_empty_content() {
        let f = fixture().await;
        let author = user(Role::User);

        let err = f
            .service
            .add_comment(&author, f.post_id, &"x".repeat(201))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));

        let err = f
            .service
            .add_comment(&author, f.post_id, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));
    }

    #[tokio::test]
    async fn comment_on_unknown_post_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .add_comment(&user(Role::User), ObjectId::new(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn like_toggles_per_user() {
        let f = fixture().await;
        let author = user(Role::User);
        let alice = user(Role::User);
        let bob = user(Role::User);

        let comment = f
            .service
            .add_comment(&author, f.post_id, "nice post")
            .await
            .unwrap();
        let id = comment.id.unwrap();

        let liked = f.service.like_comment(&id, &alice).await.unwrap();
        assert_eq!(liked.number_of_likes(), 1);

        let liked = f.service.like_comment(&id, &bob).await.unwrap();
        assert_eq!(liked.number_of_likes(), 2);

        let unliked = f.service.like_comment(&id, &alice).await.unwrap();
        assert_eq!(unliked.number_of_likes(), 1);
        assert!(!unliked.is_liked_by(&alice.id));
        assert!(unliked.is_liked_by(&bob.id));
    }

    #[tokio::test]
    async fn only_author_edits() {
        let f = fixture().await;
        let author = user(Role::User);
        let comment = f
            .service
            .add_comment(&author, f.post_id, "first draft")
            .await
            .unwrap();
        let id = comment.id.unwrap();

        let err = f
            .service
            .edit_comment(&id, &user(Role::Admin), "hijacked")
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ForbiddenError(_)));

        let edited = f
            .service
            .edit_comment(&id, &author, "  second draft ")
            .await
            .unwrap();
        assert_eq!(edited.content, "second draft");
        assert!(edited.updated_at >= edited.created_at);
    }

    #[tokio::test]
    async fn author_or_admin_deletes() {
        let f = fixture().await;
        let author = user(Role::User);

        let first = f
            .service
            .add_comment(&author, f.post_id, "one")
            .await
            .unwrap();
        let second = f
            .service
            .add_comment(&author, f.post_id, "two")
            .await
            .unwrap();

        let err = f
            .service
            .delete_comment(first.id.as_ref().unwrap(), &user(Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ForbiddenError(_)));

        f.service
            .delete_comment(first.id.as_ref().unwrap(), &author)
            .await
            .unwrap();
        f.service
            .delete_comment(second.id.as_ref().unwrap(), &user(Role::Admin))
            .await
            .unwrap();

        let remaining = f.service.get_comments_for_post(&f.post_id).await.unwrap();
        assert!(remaining.is_empty());

        let err = f
            .service
            .delete_comment(first.id.as_ref().unwrap(), &author)
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn all_comments_is_admin_only_and_counts() {
        let f = fixture().await;
        let author = user(Role::User);
        for text in ["a", "b", "c"] {
            f.service
                .add_comment(&author, f.post_id, text)
                .await
                .unwrap();
        }

        let err = f
            .service
            .get_all_comments(&author, PageOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ForbiddenError(_)));

        let page = f
            .service
            .get_all_comments(
                &user(Role::Admin),
                PageOptions {
                    limit: 2,
                    ..PageOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.comments.len(), 2);
        assert_eq!(page.comments[0].content, "c");
        assert_eq!(page.total_comments, 3);
        assert_eq!(page.last_month_comments, 3);
    }
}
