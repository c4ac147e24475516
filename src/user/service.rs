use std::sync::Arc;

use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::user::model::{DEFAULT_PROFILE_PICTURE, Role, SignInRequest, SignUpRequest, User};
use crate::user::repository::UserStore;
use crate::utils::error::CustomError;
use crate::utils::{hashing, validation};

pub struct UserService {
    users: Arc<dyn UserStore>,
    admin_email: Option<String>,
    hash_cost: u32,
}

impl UserService {
    /// `admin_email`, when set, is the address that signs up with the admin role.
    pub fn new(users: Arc<dyn UserStore>, admin_email: Option<String>) -> Self {
        UserService {
            users,
            admin_email,
            hash_cost: hashing::DEFAULT_COST,
        }
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, CustomError> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        validation::validate_username(&username)?;
        validation::validate_email(&email)?;
        validation::validate_password(&request.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CustomError::ConflictError("Email already exists".to_string()));
        }

        if self.users.username_exists(&username).await? {
            return Err(CustomError::ConflictError(
                "Username already exists".to_string(),
            ));
        }

        let hashed_password = hashing::hash_password(&request.password, self.hash_cost)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        let role = if self.admin_email.as_deref() == Some(email.as_str()) {
            Role::Admin
        } else {
            Role::User
        };

        let now = Utc::now();
        let new_user = User {
            id: None,
            username,
            email,
            password: hashed_password,
            profile_picture: request
                .profile_picture
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string()),
            role,
            created_at: now,
            updated_at: now,
        };

        let user = self.users.insert(new_user).await?;
        info!("registered user {} ({:?})", user.email, user.role);
        Ok(user)
    }

    /// Check credentials; the error does not reveal which half was wrong.
    pub async fn authenticate(&self, request: &SignInRequest) -> Result<User, CustomError> {
        let email = request.email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| CustomError::UnauthorizedError("Invalid credentials".to_string()))?;

        let matches = hashing::verify_password(&request.password, &user.password)
            .map_err(|_| CustomError::InternalServerError("Invalid credentials".to_string()))?;
        if !matches {
            return Err(CustomError::UnauthorizedError(
                "Invalid credentials".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn get_user(&self, user_id: &ObjectId) -> Result<User, CustomError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("User not found".to_string()))
    }
}
