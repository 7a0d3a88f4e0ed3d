//! User registration service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Register a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let user = user.normalized();
        user.validate()?;

        // The unique constraint still catches a concurrent duplicate
        if self.repository.users.email_exists(&user.email).await? {
            return Err(AppError::Duplicate("Email already registered".to_string()));
        }

        let created = self.repository.users.create(&user).await?;
        tracing::info!(user_id = created.id, "User registered");
        Ok(created)
    }
}
