use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest comment body accepted, counted in characters.
pub const MAX_COMMENT_LENGTH: usize = 200;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    pub content: String,
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: ObjectId, user_id: ObjectId, content: String) -> Self {
        let now = Utc::now();
        Comment {
            id: None,
            post_id,
            user_id,
            content,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn number_of_likes(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &ObjectId) -> bool {
        self.likes.contains(user_id)
    }

    /// Flip `user_id` in the like set. Returns true if the user now likes the comment.
    pub fn toggle_like(&mut self, user_id: ObjectId) -> bool {
        if let Some(pos) = self.likes.iter().position(|id| *id == user_id) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(user_id);
            true
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Comment content cannot be empty")]
    Empty,
    #[error("Comment must be at most 200 characters (got {0})")]
    TooLong(usize),
}

/// Trim `raw` and check it fits a comment. Returns the trimmed content.
pub fn validate_content(raw: &str) -> Result<String, ContentError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ContentError::Empty);
    }
    let len = content.chars().count();
    if len > MAX_COMMENT_LENGTH {
        return Err(ContentError::TooLong(len));
    }
    Ok(content.to_string())
}

/// Wire representation shared by the server responses and the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub likes: Vec<String>,
    pub number_of_likes: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        CommentResponse {
            id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
            post_id: comment.post_id.to_hex(),
            user_id: comment.user_id.to_hex(),
            content: comment.content.clone(),
            likes: comment.likes.iter().map(|id| id.to_hex()).collect(),
            number_of_likes: comment.number_of_likes(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub content: String,
    /// Optional echo of the signed-in user; must match the session when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub total_comments: u64,
    pub last_month_comments: u64,
}
