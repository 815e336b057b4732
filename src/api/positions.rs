use super::{
    types::{CreatePosition, Created, Deleted, Position, Updated, Wrapped},
    ApiClient, Envelope, Error,
};
use tracing::debug;

const POSITIONS_PATH: &str = "/api/v1/position";

impl ApiClient {
    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn create_position(
        &self,
        position: &CreatePosition,
    ) -> Result<Envelope<Created<Position>>, Error> {
        self.post_json(POSITIONS_PATH, position).await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn list_positions(&self) -> Result<Envelope<Wrapped<Vec<Position>>>, Error> {
        self.get_json(POSITIONS_PATH).await
    }

    /// Positions with their `departmentId` populated.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn list_positions_with_departments(
        &self,
    ) -> Result<Envelope<Wrapped<Vec<Position>>>, Error> {
        self.get_json(&format!("{POSITIONS_PATH}/with-departments"))
            .await
    }

    /// The backend has no per-department listing; positions are filtered client-side,
    /// matching the department either by id or by populated reference. A failed
    /// envelope is passed through untouched.
    ///
    /// # Errors
    /// Returns the request failure, or [`Error::Decode`] if the listing is not a list.
    pub async fn list_positions_by_department(
        &self,
        department_id: &str,
    ) -> Result<Envelope<Wrapped<Vec<Position>>>, Error> {
        let mut envelope = self.list_positions_with_departments().await?;
        if let Some(wrapped) = envelope.data.as_mut() {
            wrapped.data.retain(|position| {
                position
                    .department_id
                    .as_ref()
                    .is_some_and(|department| department.id() == department_id)
            });
            debug!(department_id, count = wrapped.data.len(), "positions filtered");
        }
        Ok(envelope)
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_position(&self, id: &str) -> Result<Envelope<Wrapped<Position>>, Error> {
        self.get_json(&format!("{POSITIONS_PATH}/{id}")).await
    }

    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn update_position(
        &self,
        id: &str,
        position: &CreatePosition,
    ) -> Result<Envelope<Updated<Position>>, Error> {
        self.patch_json(&format!("{POSITIONS_PATH}/{id}"), position)
            .await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn delete_position(&self, id: &str) -> Result<Envelope<Deleted<Position>>, Error> {
        self.delete_json(&format!("{POSITIONS_PATH}/{id}")).await
    }
}
