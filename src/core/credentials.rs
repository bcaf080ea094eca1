//! Credential store: user accounts and password checks

use tracing::{debug, info};

use crate::db::{DbEngine, UserTable};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::utils::auth::{hash_password, verify_password};

/// User accounts backed by the user table
#[derive(Debug, Clone)]
pub struct CredentialStore {
    db: DbEngine,
}

impl CredentialStore {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    /// Check a username/password pair
    ///
    /// An unknown username is reported as a failed check, never as an error.
    /// Usernames are trimmed the same way `create` trims them.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let username = username.trim();
        match UserTable::get_by_username(&self.db, username).await? {
            Some(user) => Ok(verify_password(password, &user.password)),
            None => {
                debug!("Login attempt for unknown user '{}'", username);
                Ok(false)
            }
        }
    }

    /// Create an account with a freshly salted password hash
    pub async fn create(&self, username: &str, password: &str, is_admin: bool) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        if UserTable::get_by_username(&self.db, username).await?.is_some() {
            return Err(AppError::UsernameTaken(username.to_string()));
        }

        let password_hash = hash_password(password);

        // the unique index still wins a race against the lookup above
        let id = match UserTable::insert(&self.db, username, &password_hash, is_admin).await {
            Ok(id) => id,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AppError::UsernameTaken(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!("Created user '{}' (id {}, admin: {})", username, id, is_admin);

        Ok(User {
            id,
            username: username.to_string(),
            password: password_hash,
            is_admin,
        })
    }

    /// Rehash a user's password; an empty password leaves it untouched
    ///
    /// Returns whether anything changed.
    pub async fn reset_password(&self, user: &User, new_password: &str) -> Result<bool> {
        if new_password.is_empty() {
            return Ok(false);
        }

        let password_hash = hash_password(new_password);
        if !UserTable::update_password(&self.db, user.id, &password_hash).await? {
            return Err(AppError::NotFound("User"));
        }

        info!("Password reset for user '{}'", user.username);
        Ok(true)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(UserTable::get_by_username(&self.db, username).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(UserTable::get_by_id(&self.db, id).await?)
    }

    /// All users in creation order
    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(UserTable::all(&self.db).await?)
    }

    /// Delete an account; its songs stay queued without a submitter
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !UserTable::delete(&self.db, id).await? {
            return Err(AppError::NotFound("User"));
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn has_users(&self) -> Result<bool> {
        Ok(UserTable::has_users(&self.db).await?)
    }
}
