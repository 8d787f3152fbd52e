//! User domain service.
//!
//! Implements [`UsersCommand`] and [`UsersQuery`] over a [`UserRepository`]
//! and a [`PasswordHasher`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    PasswordHasher, UserPersistenceError, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    Error, NewUser, PageRequest, PasswordHash, PlainPassword, User, UserChanges, UserId,
};

pub(crate) fn user_not_found(id: &UserId) -> Error {
    Error::not_found("User not found").with_details(json!({
        "id": id.to_string(),
        "code": "user_not_found",
    }))
}

fn user_has_bookings(id: &UserId) -> Error {
    Error::conflict("User has bookings; delete them first").with_details(json!({
        "id": id.to_string(),
        "code": "user_has_bookings",
    }))
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => Error::conflict("Username already registered")
            .with_details(json!({ "field": "username", "code": "duplicate_username" })),
        UserPersistenceError::DuplicateEmail => Error::conflict("Email already registered")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
        UserPersistenceError::NotFound => Error::not_found("User not found"),
        UserPersistenceError::StillReferenced => Error::conflict("User has bookings")
            .with_details(json!({ "code": "user_has_bookings" })),
    }
}

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserService<R, H> {
    /// Create a new service with the given repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> UserService<R, H>
where
    H: PasswordHasher + 'static,
{
    /// Hash on the blocking pool; key stretching would otherwise stall the
    /// async worker.
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn require(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<R, H> UsersCommand for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: NewUser) -> Result<User, Error> {
        let NewUser {
            username,
            email,
            password,
        } = request;
        let password_hash = self.hash(&password).await?;
        let user = User::new(UserId::random(), username, email, password_hash);
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let current = self.require(id).await?;
        let password_hash = match changes.password.as_ref() {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };
        let updated = current.apply(changes, password_hash);
        self.users
            .update(&updated)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.require(id).await?;
        let referenced = self
            .users
            .has_bookings(id)
            .await
            .map_err(map_user_persistence_error)?;
        if referenced {
            return Err(user_has_bookings(id));
        }
        // A booking may land between the check and the delete; the store
        // rejects that case itself.
        self.users.delete(id).await.map_err(|error| match error {
            UserPersistenceError::StillReferenced => user_has_bookings(id),
            other => map_user_persistence_error(other),
        })?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, H> UsersQuery for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, Error> {
        self.users
            .list(page)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.require(id).await
    }
}
