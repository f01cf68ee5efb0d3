use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::user::User;
use crate::storage::document::connection::{ActiveUserDoc, ChangeKind, Collection, DocumentConnection};
use crate::storage::traits::UserStore;
use crate::storage::StorageError;

/// User repository over the document backend
#[derive(Clone)]
pub struct DocumentUserRepository {
    store: DocumentConnection,
}

impl DocumentUserRepository {
    pub fn new(store: DocumentConnection) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserStore for DocumentUserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        // Usernames are unique across the store; there is no index to lean
        // on, so scan the collection.
        let existing: Vec<User> = self.store.list_documents(Collection::Users)?;
        if existing.iter().any(|u| u.username == user.username) {
            return Err(StorageError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            ))
            .into());
        }

        self.store
            .write_document(Collection::Users, &user.id, &user.id, user, ChangeKind::Created)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.store.read_document(Collection::Users, user_id)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users: Vec<User> = self.store.list_documents(Collection::Users)?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn get_active_user(&self) -> Result<Option<String>> {
        Ok(self.store.read_active_user()?.map(|doc| doc.user_id))
    }

    async fn set_active_user(&self, user_id: &str) -> Result<()> {
        let user: Option<User> = self.store.read_document(Collection::Users, user_id)?;
        if user.is_none() {
            return Err(StorageError::not_found("user", user_id).into());
        }
        self.store.write_active_user(Some(&ActiveUserDoc {
            user_id: user_id.to_string(),
        }))
    }

    async fn clear_active_user(&self) -> Result<()> {
        self.store.write_active_user(None)
    }
}
