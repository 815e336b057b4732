use crate::{
    api::{
        types::{AcceptCandidate, EmployeeStatus},
        ApiClient,
    },
    cli::globals::GlobalArgs,
    session::Access,
};
use anyhow::Result;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateAction {
    Accept(Hire),
    Reject,
    Delete,
}

/// Where and on what terms an accepted candidate is hired.
#[derive(Debug, Clone, PartialEq)]
pub struct Hire {
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub status: EmployeeStatus,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub action: CandidateAction,
    pub id: String,
}

/// Execute a candidate review action.
/// # Errors
/// Returns an error if there is no session, or the backend refuses the change.
pub async fn execute(args: Args) -> Result<()> {
    let manager = super::authorized(&args.globals, Access::Authenticated).await?;
    let api = manager.api();

    match args.action {
        CandidateAction::Accept(hire) => {
            let body = hire_terms(api, &hire).await?;
            let employee = api
                .accept_candidate(&args.id, &body)
                .await
                .and_then(|envelope| envelope.into_data())
                .map_err(super::api_failure)?
                .accepted;
            info!(id = %employee.id, "candidate accepted");
            println!(
                "Candidate {} hired as employee {} ({}, {})",
                args.id,
                employee.id,
                body.position.title,
                body.department.name
            );
        }
        CandidateAction::Reject => {
            let candidate = api
                .reject_candidate(&args.id)
                .await
                .and_then(|envelope| envelope.into_data())
                .map_err(super::api_failure)?;
            info!(id = %candidate.id, "candidate rejected");
            println!("Candidate {} is now {:?}", candidate.id, candidate.status);
        }
        CandidateAction::Delete => {
            let envelope = api
                .delete_candidate(&args.id)
                .await
                .map_err(super::api_failure)?;
            if !envelope.success {
                anyhow::bail!(
                    "{}",
                    envelope.first_error().unwrap_or("Failed to delete candidate")
                );
            }
            println!("Candidate {} deleted", args.id);
        }
    }

    Ok(())
}

/// The backend expects the full department and position records, so both are looked up
/// before the candidate is accepted.
async fn hire_terms(api: &ApiClient, hire: &Hire) -> Result<AcceptCandidate> {
    let department = api
        .get_department(&hire.department)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(super::api_failure)?
        .data;
    let position = api
        .get_position(&hire.position)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(super::api_failure)?
        .data;

    Ok(AcceptCandidate {
        department,
        position,
        salary: hire.salary,
        employee_status: hire.status,
    })
}
