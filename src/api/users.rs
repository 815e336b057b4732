//! User administration. Every call is refused locally, before any request is sent,
//! unless the stored identity is a superadmin.

use super::{
    types::{CreateAdmin, CreatedAdmin, FoundUser, Removed, Updated, UpdateUser, User, UserList},
    ApiClient, Envelope, Error,
};
use crate::{identity::Identity, storage::IDENTITY_KEY};
use tracing::warn;

const USERS_PATH: &str = "/api/v1/api/v1/users";

impl ApiClient {
    /// # Errors
    /// Returns [`Error::AccessDenied`] for non-superadmins, or the request failure.
    pub async fn list_users(&self) -> Result<Envelope<UserList>, Error> {
        self.require_super_admin("view all users")?;
        self.get_json(USERS_PATH).await
    }

    /// # Errors
    /// Returns [`Error::AccessDenied`] for non-superadmins, or the request failure.
    pub async fn get_user(&self, id: &str) -> Result<Envelope<FoundUser>, Error> {
        self.require_super_admin("view user details")?;
        self.get_json(&format!("{USERS_PATH}/{id}")).await
    }

    /// # Errors
    /// Returns [`Error::AccessDenied`] for non-superadmins, or the request failure.
    pub async fn create_user(&self, user: &CreateAdmin) -> Result<Envelope<CreatedAdmin>, Error> {
        self.require_super_admin("create new users")?;
        self.post_json(USERS_PATH, user).await
    }

    /// # Errors
    /// Returns [`Error::AccessDenied`] for non-superadmins, or the request failure.
    pub async fn update_user(
        &self,
        id: &str,
        user: &UpdateUser,
    ) -> Result<Envelope<Updated<User>>, Error> {
        self.require_super_admin("update users")?;
        self.patch_json(&format!("{USERS_PATH}/{id}"), user).await
    }

    /// # Errors
    /// Returns [`Error::AccessDenied`] for non-superadmins, or the request failure.
    pub async fn delete_user(&self, id: &str) -> Result<Envelope<Removed<User>>, Error> {
        self.require_super_admin("delete users")?;
        self.delete_json(&format!("{USERS_PATH}/{id}")).await
    }

    fn require_super_admin(&self, action: &str) -> Result<(), Error> {
        let identity = match self.storage().get(IDENTITY_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Identity>(&raw).ok(),
            Ok(None) => None,
            Err(err) => {
                warn!("Failed to read stored identity: {err}");
                None
            }
        };

        if identity.as_ref().is_some_and(Identity::is_super_admin) {
            Ok(())
        } else {
            Err(Error::AccessDenied(format!(
                "Only superadmin users can {action}"
            )))
        }
    }
}
