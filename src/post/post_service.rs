use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::SessionUser;
use crate::post::post_model::{CreatePostRequest, Post};
use crate::post::post_repository::PostStore;
use crate::utils::error::CustomError;
use crate::utils::pagination::PageOptions;

pub struct PostService {
    posts: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        PostService { posts }
    }

    pub async fn create_post(
        &self,
        author: &SessionUser,
        request: CreatePostRequest,
    ) -> Result<Post, CustomError> {
        author.require_admin()?;

        let title = request.title.trim();
        let content = request.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(CustomError::ValidationError(
                "Title and content are required".into(),
            ));
        }

        let now = Utc::now();
        self.posts
            .insert(Post {
                id: None,
                title: title.to_string(),
                content: content.to_string(),
                author_id: author.id,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    pub async fn get_post(&self, id: &ObjectId) -> Result<Post, CustomError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))
    }

    /// One page of posts plus the total count.
    pub async fn get_posts(&self, page: PageOptions) -> Result<(Vec<Post>, u64), CustomError> {
        let posts = self.posts.find_page(page).await?;
        let total = self.posts.count().await?;
        Ok((posts, total))
    }

    pub async fn delete_post(&self, caller: &SessionUser, id: &ObjectId) -> Result<(), CustomError> {
        caller.require_admin()?;

        if !self.posts.delete(id).await? {
            return Err(CustomError::NotFoundError("Post not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::user::model::Role;

    fn caller(role: Role) -> SessionUser {
        SessionUser {
            id: ObjectId::new(),
            role,
        }
    }

    fn request() -> CreatePostRequest {
        CreatePostRequest {
            title: "Hello".into(),
            content: "First post".into(),
        }
    }

    #[tokio::test]
    async fn only_admins_create_posts() {
        let service = PostService::new(Arc::new(MemoryStore::new()));

        let err = service
            .create_post(&caller(Role::User), request())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ForbiddenError(_)));

        let admin = caller(Role::Admin);
        let post = service.create_post(&admin, request()).await.unwrap();
        assert_eq!(post.author_id, admin.id);

        let (posts, total) = service.get_posts(PageOptions::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(posts[0].id, post.id);
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let service = PostService::new(Arc::new(MemoryStore::new()));
        let err = service
            .delete_post(&caller(Role::Admin), &ObjectId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }
}
