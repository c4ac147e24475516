pub mod db;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use mongodb::Database;

use crate::comment::repository::{CommentStore, MongoCommentStore};
use crate::post::post_repository::{MongoPostStore, PostStore};
use crate::user::repository::{MongoUserStore, UserStore};

pub use self::db::connect_to_mongo;
pub use self::memory::MemoryStore;
pub use self::redis::{RedisService, SessionRegistry};

/// One handle per collection, all pointing at the same backend.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
}

impl Stores {
    pub fn mongo(db: &Database) -> Self {
        Stores {
            users: Arc::new(MongoUserStore::new(db)),
            posts: Arc::new(MongoPostStore::new(db)),
            comments: Arc::new(MongoCommentStore::new(db)),
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Stores {
            users: store.clone(),
            posts: store.clone(),
            comments: store,
        }
    }
}
