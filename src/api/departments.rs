use super::{
    types::{CreateDepartment, Department, Removed, Updated, Wrapped},
    ApiClient, Envelope, Error,
};

const DEPARTMENTS_PATH: &str = "/api/v1/departments";

impl ApiClient {
    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn create_department(
        &self,
        department: &CreateDepartment,
    ) -> Result<Envelope<Department>, Error> {
        self.post_json(DEPARTMENTS_PATH, department).await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn list_departments(&self) -> Result<Envelope<Wrapped<Vec<Department>>>, Error> {
        self.get_json(DEPARTMENTS_PATH).await
    }

    /// Departments with their `positions` populated.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn list_departments_with_positions(
        &self,
    ) -> Result<Envelope<Wrapped<Vec<Department>>>, Error> {
        self.get_json(&format!("{DEPARTMENTS_PATH}/with-positions"))
            .await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_department(&self, id: &str) -> Result<Envelope<Wrapped<Department>>, Error> {
        self.get_json(&format!("{DEPARTMENTS_PATH}/{id}")).await
    }

    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn update_department(
        &self,
        id: &str,
        department: &CreateDepartment,
    ) -> Result<Envelope<Updated<Department>>, Error> {
        self.patch_json(&format!("{DEPARTMENTS_PATH}/{id}"), department)
            .await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn delete_department(
        &self,
        id: &str,
    ) -> Result<Envelope<Removed<Department>>, Error> {
        self.delete_json(&format!("{DEPARTMENTS_PATH}/{id}")).await
    }
}
