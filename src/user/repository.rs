use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::user::model::User;
use crate::utils::error::CustomError;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, CustomError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError>;
    async fn username_exists(&self, username: &str) -> Result<bool, CustomError>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        MongoUserStore {
            collection: db.collection::<User>("users"),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, mut user: User) -> Result<User, CustomError> {
        let result = self.collection.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        if user.id.is_none() {
            return Err(CustomError::InternalServerError(
                "Failed to get inserted ID".to_string(),
            ));
        }
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, CustomError> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count > 0)
    }
}
