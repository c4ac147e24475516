use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::error::ClientError;
use crate::comment::model::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};
use crate::post::post_model::{CreatePostRequest, PostResponse};
use crate::user::model::{PublicUser, SignInRequest, SignUpRequest};

/// Comment endpoints as seen by the comment section.
#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn create_comment(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
        content: &str,
    ) -> Result<CommentResponse, ClientError>;

    async fn get_comments(&self, post_id: &str) -> Result<Vec<CommentResponse>, ClientError>;

    async fn like_comment(
        &self,
        token: &str,
        comment_id: &str,
    ) -> Result<CommentResponse, ClientError>;

    async fn edit_comment(
        &self,
        token: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<CommentResponse, ClientError>;

    async fn delete_comment(&self, token: &str, comment_id: &str) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct CommentBody {
    comment: CommentResponse,
}

#[derive(Deserialize)]
struct CommentsBody {
    comments: Vec<CommentResponse>,
}

#[derive(Deserialize)]
struct UserBody {
    user: PublicUser,
}

#[derive(Deserialize)]
struct PostBody {
    post: PostResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedIn {
    pub token: String,
    pub user: PublicUser,
}

/// REST client for the blog API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Send and decode the envelope; non-2xx become `ClientError::Http`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get("message")?.as_str().map(str::to_owned))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<PublicUser, ClientError> {
        let body: UserBody = self
            .send(self.http.post(self.url("/auth/signup")).json(request))
            .await?;
        Ok(body.user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, ClientError> {
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/auth/signin")).json(&request))
            .await
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), ClientError> {
        let _: Value = self
            .send(self.http.post(self.url("/auth/signout")).bearer_auth(token))
            .await?;
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<PublicUser, ClientError> {
        let body: UserBody = self
            .send(self.http.get(self.url(&format!("/user/{}", user_id))))
            .await?;
        Ok(body.user)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PostResponse, ClientError> {
        let body: PostBody = self
            .send(self.http.get(self.url(&format!("/post/{}", post_id))))
            .await?;
        Ok(body.post)
    }

    pub async fn create_post(
        &self,
        token: &str,
        request: &CreatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        let body: PostBody = self
            .send(
                self.http
                    .post(self.url("/post/create"))
                    .bearer_auth(token)
                    .json(request),
            )
            .await?;
        Ok(body.post)
    }
}

#[async_trait]
impl CommentApi for ApiClient {
    async fn create_comment(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
        content: &str,
    ) -> Result<CommentResponse, ClientError> {
        let request = CreateCommentRequest {
            post_id: post_id.to_string(),
            content: content.to_string(),
            user_id: Some(user_id.to_string()),
        };
        let body: CommentBody = self
            .send(
                self.http
                    .post(self.url("/comment/create"))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Ok(body.comment)
    }

    async fn get_comments(&self, post_id: &str) -> Result<Vec<CommentResponse>, ClientError> {
        let body: CommentsBody = self
            .send(
                self.http
                    .get(self.url(&format!("/comment/get-comments/{}", post_id))),
            )
            .await?;
        Ok(body.comments)
    }

    async fn like_comment(
        &self,
        token: &str,
        comment_id: &str,
    ) -> Result<CommentResponse, ClientError> {
        let body: CommentBody = self
            .send(
                self.http
                    .put(self.url(&format!("/comment/likeComment/{}", comment_id)))
                    .bearer_auth(token),
            )
            .await?;
        Ok(body.comment)
    }

    async fn edit_comment(
        &self,
        token: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<CommentResponse, ClientError> {
        let request = UpdateCommentRequest {
            content: content.to_string(),
        };
        let body: CommentBody = self
            .send(
                self.http
                    .put(self.url(&format!("/comment/editComment/{}", comment_id)))
                    .bearer_auth(token)
                    .json(&request),
            )
            .await?;
        Ok(body.comment)
    }

    async fn delete_comment(&self, token: &str, comment_id: &str) -> Result<(), ClientError> {
        let _: Value = self
            .send(
                self.http
                    .delete(self.url(&format!("/comment/deleteComment/{}", comment_id)))
                    .bearer_auth(token),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::context::{AppContext, CurrentUser};
    use crate::user::model::Role;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn comment_json(id: &str, likes: &[&str]) -> Value {
        json!({
            "_id": id,
            "postId": "64b7f0f0f0f0f0f0f0f0f0f0",
            "userId": "64b7f0f0f0f0f0f0f0f0f0f1",
            "content": "hello",
            "likes": likes,
            "numberOfLikes": likes.len(),
            "createdAt": Utc::now(),
            "updatedAt": Utc::now(),
        })
    }

    #[tokio::test]
    async fn create_sends_bearer_token_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/comment/create"))
            .and(header("authorization", "Bearer tok"))
            .and(body_partial_json(json!({
                "postId": "64b7f0f0f0f0f0f0f0f0f0f0",
                "content": "hello",
                "userId": "64b7f0f0f0f0f0f0f0f0f0f1",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "comment": comment_json("64b7f0f0f0f0f0f0f0f0f0aa", &[]),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let comment = api
            .create_comment(
                "tok",
                "64b7f0f0f0f0f0f0f0f0f0f1",
                "64b7f0f0f0f0f0f0f0f0f0f0",
                "hello",
            )
            .await
            .unwrap();
        assert_eq!(comment.id, "64b7f0f0f0f0f0f0f0f0f0aa");
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/comment/editComment/abc"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "success": false,
                "message": "Forbidden: You are not allowed to edit this comment",
                "httpStatusCode": 403,
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let err = api.edit_comment("tok", "abc", "new").await.unwrap_err();
        match err {
            ClientError::Http { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("not allowed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lists_comments_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/comment/get-comments/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "count": 2,
                "comments": [
                    comment_json("64b7f0f0f0f0f0f0f0f0f0a2", &["u1"]),
                    comment_json("64b7f0f0f0f0f0f0f0f0f0a1", &[]),
                ],
            })))
            .mount(&server)
            .await;

        let comments = ApiClient::new(server.uri()).get_comments("p1").await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].number_of_likes, 1);
    }

    fn user_json(id: &str, role: &str) -> Value {
        json!({
            "_id": id,
            "username": "jane",
            "email": "jane@example.com",
            "profilePicture": "https://example.com/jane.png",
            "role": role,
            "createdAt": Utc::now(),
        })
    }

    fn post_json(id: &str) -> Value {
        json!({
            "_id": id,
            "authorId": "64b7f0f0f0f0f0f0f0f0f0f1",
            "title": "Hello",
            "content": "First post",
            "createdAt": Utc::now(),
            "updatedAt": Utc::now(),
        })
    }

    #[tokio::test]
    async fn sign_in_response_becomes_current_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .and(body_partial_json(json!({
                "email": "jane@example.com",
                "password": "Secret123",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login successful",
                "httpStatusCode": 200,
                "service": "blog",
                "token": "jwt-token",
                "user": user_json("64b7f0f0f0f0f0f0f0f0f0f1", "admin"),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let signed_in = ApiClient::new(server.uri())
            .sign_in("jane@example.com", "Secret123")
            .await
            .unwrap();

        let mut ctx = AppContext::new();
        ctx.sign_in(CurrentUser::from(signed_in));

        let user = ctx.current_user.as_ref().unwrap();
        assert_eq!(user.token, "jwt-token");
        assert_eq!(user.id(), "64b7f0f0f0f0f0f0f0f0f0f1");
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn rejected_sign_in_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Unauthorized: Invalid credentials",
                "httpStatusCode": 401,
            })))
            .mount(&server)
            .await;

        let err = ApiClient::new(server.uri())
            .sign_in("jane@example.com", "Wrong1234")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn sign_up_returns_public_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .and(body_partial_json(json!({ "username": "jane" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "user": user_json("64b7f0f0f0f0f0f0f0f0f0f1", "user"),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = SignUpRequest {
            username: "jane".into(),
            email: "jane@example.com".into(),
            password: "Secret123".into(),
            profile_picture: None,
        };
        let user = ApiClient::new(server.uri()).sign_up(&request).await.unwrap();
        assert_eq!(user.username, "jane");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn sign_out_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signout"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "User has been signed out",
            })))
            .expect(1)
            .mount(&server)
            .await;

        ApiClient::new(server.uri()).sign_out("tok").await.unwrap();
    }

    #[tokio::test]
    async fn fetches_user_and_post_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/64b7f0f0f0f0f0f0f0f0f0f1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": user_json("64b7f0f0f0f0f0f0f0f0f0f1", "user"),
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/post/64b7f0f0f0f0f0f0f0f0f0b1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "post": post_json("64b7f0f0f0f0f0f0f0f0f0b1"),
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let user = api.get_user("64b7f0f0f0f0f0f0f0f0f0f1").await.unwrap();
        let post = api.get_post("64b7f0f0f0f0f0f0f0f0f0b1").await.unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.author_id, "64b7f0f0f0f0f0f0f0f0f0f1");
    }

    #[tokio::test]
    async fn create_post_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/post/create"))
            .and(header("authorization", "Bearer admin"))
            .and(body_partial_json(json!({ "title": "Hello" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "post": post_json("64b7f0f0f0f0f0f0f0f0f0b2"),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreatePostRequest {
            title: "Hello".into(),
            content: "First post".into(),
        };
        let post = ApiClient::new(server.uri())
            .create_post("admin", &request)
            .await
            .unwrap();
        assert_eq!(post.id, "64b7f0f0f0f0f0f0f0f0f0b2");
    }
}
