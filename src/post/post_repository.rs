use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::post::post_model::Post;
use crate::utils::error::CustomError;
use crate::utils::pagination::PageOptions;

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, CustomError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;
    async fn find_page(&self, page: PageOptions) -> Result<Vec<Post>, CustomError>;
    async fn count(&self) -> Result<u64, CustomError>;
    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoPostStore {
    collection: Collection<Post>,
}

impl MongoPostStore {
    pub fn new(db: &Database) -> Self {
        MongoPostStore {
            collection: db.collection::<Post>("posts"),
        }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, mut post: Post) -> Result<Post, CustomError> {
        let result = self.collection.insert_one(&post).await?;
        post.id = result.inserted_id.as_object_id();
        if post.id.is_none() {
            return Err(CustomError::InternalServerError(
                "Failed to get inserted post ID".into(),
            ));
        }
        Ok(post)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_page(&self, page: PageOptions) -> Result<Vec<Post>, CustomError> {
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

    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
