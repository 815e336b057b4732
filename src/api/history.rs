use super::{
    types::{PositionHistory, SalaryHistory},
    ApiClient, Envelope, Error,
};

const HISTORY_PATH: &str = "/api/v1/history";

impl ApiClient {
    /// Salary changes, optionally narrowed to one employee.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn salary_history(
        &self,
        employee_id: Option<&str>,
    ) -> Result<Envelope<SalaryHistory>, Error> {
        self.get_json(&history_path("salary", employee_id)).await
    }

    /// Position changes, optionally narrowed to one employee.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn position_history(
        &self,
        employee_id: Option<&str>,
    ) -> Result<Envelope<PositionHistory>, Error> {
        self.get_json(&history_path("position", employee_id)).await
    }
}

fn history_path(kind: &str, employee_id: Option<&str>) -> String {
    match employee_id {
        Some(id) => format!("{HISTORY_PATH}/{kind}/employee/{id}"),
        None => format!("{HISTORY_PATH}/{kind}"),
    }
}
