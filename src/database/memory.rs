use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::comment::model::Comment;
use crate::comment::repository::CommentStore;
use crate::post::post_model::Post;
use crate::post::post_repository::PostStore;
use crate::user::model::User;
use crate::user::repository::UserStore;
use crate::utils::error::CustomError;
use crate::utils::pagination::{PageOptions, SortDirection};

/// Process-local document store. Vectors keep insertion order so that
/// documents created within the same instant still sort deterministically.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    posts: RwLock<Vec<Post>>,
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stable sort by creation time; ties keep insertion order (reversed for `Desc`).
fn ordered<T: Clone>(
    items: &[T],
    direction: SortDirection,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = match direction {
        SortDirection::Asc => items.to_vec(),
        SortDirection::Desc => items.iter().rev().cloned().collect(),
    };
    match direction {
        SortDirection::Asc => out.sort_by_key(|item| created_at(item)),
        SortDirection::Desc => out.sort_by(|a, b| created_at(b).cmp(&created_at(a))),
    }
    out
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, mut user: User) -> Result<User, CustomError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(CustomError::ConflictError("Email already exists".into()));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert(&self, mut post: Post) -> Result<Post, CustomError> {
        post.id = Some(ObjectId::new());
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id.as_ref() == Some(id)).cloned())
    }

    async fn find_page(&self, page: PageOptions) -> Result<Vec<Post>, CustomError> {
        let posts = self.posts.read().await;
        Ok(page.apply(ordered(&posts, page.sort, |p| p.created_at)))
    }

    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id.as_ref() != Some(id));
        Ok(posts.len() < before)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert(&self, mut comment: Comment) -> Result<Comment, CustomError> {
        comment.id = Some(ObjectId::new());
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|c| c.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let comments = self.comments.read().await;
        let matching: Vec<Comment> = comments
            .iter()
            .filter(|c| c.post_id == *post_id)
            .cloned()
            .collect();
        Ok(ordered(&matching, SortDirection::Desc, |c| c.created_at))
    }

    async fn find_page(&self, page: PageOptions) -> Result<Vec<Comment>, CustomError> {
        let comments = self.comments.read().await;
        Ok(page.apply(ordered(&comments, page.sort, |c| c.created_at)))
    }

    async fn count(&self, since: Option<DateTime<Utc>>) -> Result<u64, CustomError> {
        let comments = self.comments.read().await;
        let count = match since {
            Some(since) => comments.iter().filter(|c| c.created_at >= since).count(),
            None => comments.len(),
        };
        Ok(count as u64)
    }

    async fn update_content(
        &self,
        id: &ObjectId,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, CustomError> {
        let mut comments = self.comments.write().await;
        Ok(comments
            .iter_mut()
            .find(|c| c.id.as_ref() == Some(id))
            .map(|c| {
                c.content = content.to_string();
                c.updated_at = at;
                c.clone()
            }))
    }

    async fn toggle_like(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<Comment>, CustomError> {
        let mut comments = self.comments.write().await;
        Ok(comments
            .iter_mut()
            .find(|c| c.id.as_ref() == Some(id))
            .map(|c| {
                c.toggle_like(*user_id);
                c.clone()
            }))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.id.as_ref() != Some(id));
        Ok(comments.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn comment_at(post_id: ObjectId, content: &str, created_at: DateTime<Utc>) -> Comment {
        let mut comment = Comment::new(post_id, ObjectId::new(), content.into());
        comment.created_at = created_at;
        comment
    }

    #[tokio::test]
    async fn comments_for_post_are_newest_first() {
        let store = MemoryStore::new();
        let post_id = ObjectId::new();
        let now = Utc::now();

        CommentStore::insert(&store, comment_at(post_id, "old", now - Duration::hours(2)))
            .await
            .unwrap();
        CommentStore::insert(&store, comment_at(post_id, "new", now))
            .await
            .unwrap();
        CommentStore::insert(&store, comment_at(ObjectId::new(), "elsewhere", now))
            .await
            .unwrap();

        let listed = store.find_by_post(&post_id).await.unwrap();
        let contents: Vec<_> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn same_instant_falls_back_to_insertion_order() {
        let store = MemoryStore::new();
        let post_id = ObjectId::new();
        let now = Utc::now();

        for content in ["first", "second", "third"] {
            CommentStore::insert(&store, comment_at(post_id, content, now))
                .await
                .unwrap();
        }

        let listed = store.find_by_post(&post_id).await.unwrap();
        let contents: Vec<_> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn count_since_filters_old_comments() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let post_id = ObjectId::new();

        CommentStore::insert(&store, comment_at(post_id, "ancient", now - Duration::days(60)))
            .await
            .unwrap();
        CommentStore::insert(&store, comment_at(post_id, "recent", now))
            .await
            .unwrap();

        assert_eq!(CommentStore::count(&store, None).await.unwrap(), 2);
        assert_eq!(
            CommentStore::count(&store, Some(now - Duration::days(30)))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn toggle_like_on_missing_comment_is_none() {
        let store = MemoryStore::new();
        let result = store
            .toggle_like(&ObjectId::new(), &ObjectId::new())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
