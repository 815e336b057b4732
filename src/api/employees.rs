use super::{
    types::{Employee, EmployeeList, EmployeeStatus, FoundEmployee, Position, Updated},
    ApiClient, Envelope, Error,
};
use serde_json::{json, Value};

const EMPLOYEES_PATH: &str = "/api/v1/employee";

type EmployeeUpdate = Result<Envelope<Updated<Employee>>, Error>;

impl ApiClient {
    /// # Errors
    /// Returns the request failure.
    pub async fn list_employees(&self) -> Result<Envelope<EmployeeList>, Error> {
        self.get_json(EMPLOYEES_PATH).await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_employee(&self, id: &str) -> Result<Envelope<FoundEmployee>, Error> {
        self.get_json(&format!("{EMPLOYEES_PATH}/{id}")).await
    }

    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn update_employee_salary(&self, id: &str, salary: f64) -> EmployeeUpdate {
        self.update_employee(id, "salary", &json!({ "newSalary": salary }))
            .await
    }

    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn update_employee_position(&self, id: &str, position: &Position) -> EmployeeUpdate {
        self.update_employee(id, "position", &json!({ "newPosition": position }))
            .await
    }

    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn update_employee_department(
        &self,
        id: &str,
        department_id: &str,
    ) -> EmployeeUpdate {
        self.update_employee(id, "department", &json!({ "newDepartment": department_id }))
            .await
    }

    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn update_employee_status(&self, id: &str, status: EmployeeStatus) -> EmployeeUpdate {
        self.update_employee(id, "status", &json!({ "status": status.as_str() }))
            .await
    }

    async fn update_employee(&self, id: &str, field: &str, body: &Value) -> EmployeeUpdate {
        self.patch_json(&format!("{EMPLOYEES_PATH}/{id}/{field}"), body)
            .await
    }
}
