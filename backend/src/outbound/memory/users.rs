use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, RegistrationOutcome, User, UserRole};

/// User store keyed by email.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Email, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stored role of `email`, returning whether a row existed.
    ///
    /// Stands in for the out-of-band database update that promotes admins.
    pub fn set_role(&self, email: &Email, role: UserRole) -> Result<bool, UserRepositoryError> {
        let mut users = lock(&self.users, UserRepositoryError::query)?;
        Ok(users
            .get_mut(email)
            .map(|user| user.role = role)
            .is_some())
    }

    pub fn len(&self) -> Result<usize, UserRepositoryError> {
        Ok(lock(&self.users, UserRepositoryError::query)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, UserRepositoryError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert_if_absent(
        &self,
        user: &User,
    ) -> Result<RegistrationOutcome, UserRepositoryError> {
        let mut users = lock(&self.users, UserRepositoryError::query)?;
        if users.contains_key(&user.email) {
            return Ok(RegistrationOutcome::AlreadyExists);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(RegistrationOutcome::Inserted(user.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(lock(&self.users, UserRepositoryError::query)?
            .get(email)
            .cloned())
    }
}
