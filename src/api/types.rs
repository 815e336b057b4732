//! Request and response payloads of the HR backend. Field names follow the backend's
//! camelCase JSON; every non-key field tolerates absence so a schema drift on the backend
//! degrades to defaults instead of failing the whole call.

use crate::identity::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `data` of a successful login; `token` is the bearer credential.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub status: Option<String>,
    pub token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default, deserialize_with = "crate::identity::lenient_role")]
    pub role: Option<Role>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateAdmin {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateUser {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub all: Vec<User>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FoundUser {
    #[serde(rename = "findOne")]
    pub user: User,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreatedAdmin {
    pub admin: User,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "male")]
    Male,
    // The backend enum carries this spelling.
    #[serde(rename = "famale")]
    Female,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CandidateStatus {
    #[default]
    Pending,
    Reviewing,
    Accepted,
    Rejected,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Working,
    Probation,
    Fired,
}

impl EmployeeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Working => "working",
            EmployeeStatus::Probation => "probation",
            EmployeeStatus::Fired => "fired",
        }
    }
}

impl FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "working" => Ok(EmployeeStatus::Working),
            "probation" => Ok(EmployeeStatus::Probation),
            "fired" => Ok(EmployeeStatus::Fired),
            other => Err(format!("invalid employee status: {other}")),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct JobRequirement {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub salary: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Education {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub speciality: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Course {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LangGrade {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub grade: String,
}

/// Personal data shared by candidates and the employees they become.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tg_username: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub job_requirement: JobRequirement,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub course: Vec<Course>,
    #[serde(default)]
    pub lang_grades: Vec<LangGrade>,
    #[serde(default)]
    pub hard_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub driving_licence: Vec<String>,
    #[serde(default)]
    pub criminal_records: bool,
    #[serde(default)]
    pub extra_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub status: CandidateStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Public intake form submission.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidate {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidateStatus>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FoundCandidate {
    pub updated: Candidate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<Position>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateDepartment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A position's department is either an id or the populated department.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DepartmentRef {
    Id(String),
    Populated(Box<Department>),
}

impl DepartmentRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            DepartmentRef::Id(id) => id,
            DepartmentRef::Populated(department) => &department.id,
        }
    }

    /// Display name, if populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            DepartmentRef::Id(_) => None,
            DepartmentRef::Populated(department) => Some(&department.name),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An employee's position is either an id or the populated position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PositionRef {
    Id(String),
    Populated(Box<Position>),
}

impl PositionRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            PositionRef::Id(id) => id,
            PositionRef::Populated(position) => &position.id,
        }
    }

    /// Display title, if populated.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            PositionRef::Id(_) => None,
            PositionRef::Populated(position) => Some(&position.title),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePosition {
    pub title: String,
    pub department_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
    #[serde(default)]
    pub position: Option<PositionRef>,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub employee_status: EmployeeStatus,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptCandidate {
    pub department: Department,
    pub position: Position,
    pub salary: f64,
    pub employee_status: EmployeeStatus,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Accepted {
    pub accepted: Employee,
}

/// `{ data: [...] }` / `{ data: {...} }` wrapper used by the catalog endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Wrapped<T> {
    pub data: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Updated<T> {
    pub updated: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Removed<T> {
    pub removed: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Created<T> {
    pub created: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Deleted<T> {
    pub deleted: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmployeeList {
    #[serde(default)]
    pub employees: Vec<Employee>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FoundEmployee {
    pub employee: Employee,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryHistory {
    #[serde(default)]
    pub salary_history: Vec<Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHistory {
    #[serde(default)]
    pub position_history: Vec<Value>,
}
