use crate::{cli::globals::GlobalArgs, session::Access};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Candidates,
    Employees,
    Departments,
    Positions,
    Users,
    SalaryHistory,
    PositionHistory,
}

impl Resource {
    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Resource::Users => Access::SuperAdmin,
            _ => Access::Authenticated,
        }
    }
}

impl FromStr for Resource {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "candidates" => Ok(Resource::Candidates),
            "employees" => Ok(Resource::Employees),
            "departments" => Ok(Resource::Departments),
            "positions" => Ok(Resource::Positions),
            "users" => Ok(Resource::Users),
            "salary-history" => Ok(Resource::SalaryHistory),
            "position-history" => Ok(Resource::PositionHistory),
            other => Err(anyhow!("unknown resource: {other}")),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub resource: Resource,
    pub status: Option<String>,
    pub employee: Option<String>,
}

/// Execute the list action.
/// # Errors
/// Returns an error if there is no session, or the backend call fails.
pub async fn execute(args: Args) -> Result<()> {
    let manager = super::authorized(&args.globals, args.resource.access()).await?;
    let api = manager.api();
    let employee = args.employee.as_deref();

    let output = match args.resource {
        Resource::Candidates => {
            let query: Vec<(&str, String)> = args
                .status
                .into_iter()
                .map(|status| ("status", status))
                .collect();
            let candidates = api.list_candidates(&query).await;
            render(candidates.and_then(|envelope| envelope.into_data()))
        }
        Resource::Employees => render(
            api.list_employees()
                .await
                .and_then(|envelope| envelope.into_data())
                .map(|list| list.employees),
        ),
        Resource::Departments => render(
            api.list_departments_with_positions()
                .await
                .and_then(|envelope| envelope.into_data())
                .map(|wrapped| wrapped.data),
        ),
        Resource::Positions => render(
            api.list_positions_with_departments()
                .await
                .and_then(|envelope| envelope.into_data())
                .map(|wrapped| wrapped.data),
        ),
        Resource::Users => render(
            api.list_users()
                .await
                .and_then(|envelope| envelope.into_data())
                .map(|list| list.all),
        ),
        Resource::SalaryHistory => render(
            api.salary_history(employee)
                .await
                .and_then(|envelope| envelope.into_data())
                .map(|history| history.salary_history),
        ),
        Resource::PositionHistory => render(
            api.position_history(employee)
                .await
                .and_then(|envelope| envelope.into_data())
                .map(|history| history.position_history),
        ),
    }?;

    println!("{output}");
    Ok(())
}

fn render<T: Serialize>(result: Result<T, crate::api::Error>) -> Result<String> {
    let data = result.map_err(super::api_failure)?;
    Ok(serde_json::to_string_pretty(&data)?)
}
