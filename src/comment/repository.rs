use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use crate::comment::model::Comment;
use crate::utils::error::CustomError;
use crate::utils::pagination::PageOptions;

/// Persistence for comments. Implemented by MongoDB and by the in-memory store.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment and return it with its assigned id.
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError>;

    /// Comments of one post, newest first.
    async fn find_by_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError>;

    async fn find_page(&self, page: PageOptions) -> Result<Vec<Comment>, CustomError>;

    /// Count comments, optionally only those created at or after `since`.
    async fn count(&self, since: Option<DateTime<Utc>>) -> Result<u64, CustomError>;

    async fn update_content(
        &self,
        id: &ObjectId,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, CustomError>;

    /// Add `user_id` to the like set if absent, remove it otherwise.
    /// Returns the comment after the change, or `None` if it does not exist.
    async fn toggle_like(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<Comment>, CustomError>;

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoCommentStore {
    collection: Collection<Comment>,
}

impl MongoCommentStore {
    pub fn new(db: &Database) -> Self {
        MongoCommentStore {
            collection: db.collection::<Comment>("comments"),
        }
    }
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn insert(&self, mut comment: Comment) -> Result<Comment, CustomError> {
        let result = self.collection.insert_one(&comment).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted comment ID".to_string())
        })?;
        comment.id = Some(id);
        Ok(comment)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_post(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "post_id": post_id })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_page(&self, page: PageOptions) -> Result<Vec<Comment>, CustomError> {
        let direction = page.mongo_sort();
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": direction, "_id": direction })
            .skip(page.start_index)
            .limit(page.limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, since: Option<DateTime<Utc>>) -> Result<u64, CustomError> {
        let filter = match since {
            Some(since) => doc! { "created_at": { "$gte": bson::DateTime::from_chrono(since) } },
            None => doc! {},
        };
        Ok(self.collection.count_documents(filter).await?)
    }

    async fn update_content(
        &self,
        id: &ObjectId,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, CustomError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "content": content,
                        "updated_at": bson::DateTime::from_chrono(at),
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn toggle_like(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<Comment>, CustomError> {
        // Each branch is a single conditional update, so concurrent toggles
        // by the same user never leave a duplicate in the set.
        let unliked = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "likes": user_id },
                doc! { "$pull": { "likes": user_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        if unliked.is_some() {
            return Ok(unliked);
        }

        let liked = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "likes": { "$ne": user_id } },
                doc! { "$addToSet": { "likes": user_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match liked {
            Some(comment) => Ok(Some(comment)),
            None => self.find_by_id(id).await,
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
