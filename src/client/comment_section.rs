use crate::client::api::CommentApi;
use crate::client::context::{AppContext, CurrentUser};
use crate::client::error::ClientError;
use crate::comment::model::{CommentResponse, MAX_COMMENT_LENGTH, validate_content};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub comment_id: String,
    pub content: String,
}

/// State behind the comment box and list under a post.
pub struct CommentSection<A: CommentApi> {
    api: A,
    post_id: String,
    draft: String,
    comments: Vec<CommentResponse>,
    error: Option<String>,
    loading: bool,
    editing: Option<EditState>,
    pending_delete: Option<String>,
}

fn signed_in(ctx: &AppContext) -> Result<&CurrentUser, ClientError> {
    ctx.current_user.as_ref().ok_or(ClientError::Unauthenticated)
}

impl<A: CommentApi> CommentSection<A> {
    pub fn new(api: A, post_id: impl Into<String>) -> Self {
        CommentSection {
            api,
            post_id: post_id.into(),
            draft: String::new(),
            comments: Vec::new(),
            error: None,
            loading: false,
            editing: None,
            pending_delete: None,
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn comments(&self) -> &[CommentResponse] {
        &self.comments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Characters left before the limit; negative once over it.
    pub fn remaining_chars(&self) -> isize {
        MAX_COMMENT_LENGTH as isize - self.draft.chars().count() as isize
    }

    pub fn can_edit(&self, comment: &CommentResponse, ctx: &AppContext) -> bool {
        ctx.current_user
            .as_ref()
            .is_some_and(|user| user.id() == comment.user_id)
    }

    pub fn can_delete(&self, comment: &CommentResponse, ctx: &AppContext) -> bool {
        ctx.current_user
            .as_ref()
            .is_some_and(|user| user.id() == comment.user_id || user.is_admin())
    }

    /// Keep the outcome, mirroring any failure into the inline error.
    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
        result
    }

    fn replace(&mut self, updated: CommentResponse) {
        if let Some(slot) = self.comments.iter_mut().find(|c| c.id == updated.id) {
            *slot = updated;
        }
    }

    /// Fetch the post's comments in server order.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.api.get_comments(&self.post_id).await;
        self.loading = false;

        let comments = self.record(result)?;
        self.comments = comments;
        Ok(())
    }

    /// Post the draft. Invalid drafts never reach the network.
    pub async fn submit(&mut self, ctx: &AppContext) -> Result<(), ClientError> {
        let checked = validate_content(&self.draft)
            .map_err(ClientError::from)
            .and_then(|content| Ok((content, signed_in(ctx)?.clone())));
        let (content, user) = self.record(checked)?;

        self.loading = true;
        let result = self
            .api
            .create_comment(&user.token, user.id(), &self.post_id, &content)
            .await;
        self.loading = false;

        let created = self.record(result)?;
        self.draft.clear();
        self.comments.insert(0, created);
        Ok(())
    }

    pub async fn like(&mut self, ctx: &AppContext, comment_id: &str) -> Result<(), ClientError> {
        let user = self.record(signed_in(ctx).cloned())?;
        let result = self.api.like_comment(&user.token, comment_id).await;
        let updated = self.record(result)?;
        self.replace(updated);
        Ok(())
    }

    pub fn start_edit(&mut self, comment_id: &str) {
        self.editing = self
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .map(|c| EditState {
                comment_id: c.id.clone(),
                content: c.content.clone(),
            });
    }

    pub fn set_edit_content(&mut self, text: impl Into<String>) {
        if let Some(editing) = self.editing.as_mut() {
            editing.content = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn save_edit(&mut self, ctx: &AppContext) -> Result<(), ClientError> {
        let Some(editing) = self.editing.clone() else {
            return Ok(());
        };

        let checked = validate_content(&editing.content)
            .map_err(ClientError::from)
            .and_then(|content| Ok((content, signed_in(ctx)?.clone())));
        let (content, user) = self.record(checked)?;

        let result = self
            .api
            .edit_comment(&user.token, &editing.comment_id, &content)
            .await;
        let updated = self.record(result)?;
        self.replace(updated);
        self.editing = None;
        Ok(())
    }

    /// First step of deletion: remember which comment the user wants gone.
    pub fn request_delete(&mut self, comment_id: &str) {
        self.pending_delete = Some(comment_id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step: actually delete the pending comment.
    pub async fn confirm_delete(&mut self, ctx: &AppContext) -> Result<(), ClientError> {
        let Some(comment_id) = self.pending_delete.take() else {
            return Ok(());
        };

        let user = self.record(signed_in(ctx).cloned())?;
        let result = self.api.delete_comment(&user.token, &comment_id).await;
        self.record(result)?;
        self.comments.retain(|c| c.id != comment_id);
        Ok(())
    }
}
