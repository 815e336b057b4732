pub mod logging;

use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    value_parser, Arg, ArgAction, ColorChoice, Command,
};
use url::Url;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STATE_FILE: &str = "state-file";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_REVALIDATE_INTERVAL: &str = "revalidate-interval";
pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_RESOURCE: &str = "resource";
pub const ARG_STATUS: &str = "status";
pub const ARG_EMPLOYEE: &str = "employee";
pub const ARG_ID: &str = "id";
pub const ARG_MODE: &str = "mode";
pub const ARG_DEPARTMENT: &str = "department";
pub const ARG_POSITION: &str = "position";
pub const ARG_SALARY: &str = "salary";
pub const ARG_EMPLOYEE_STATUS: &str = "employee-status";

pub const RESOURCES: [&str; 7] = [
    "candidates",
    "employees",
    "departments",
    "positions",
    "users",
    "salary-history",
    "position-history",
];

#[must_use]
pub fn validator_url() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<String, String> {
        let url = Url::parse(value).map_err(|err| format!("invalid URL: {err}"))?;
        match url.scheme() {
            "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
            scheme => Err(format!("unsupported URL scheme: {scheme}")),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("hrdesk")
        .about("HR administration console")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Backend base URL")
                .default_value(crate::api::DEFAULT_BASE_URL)
                .env("HRDESK_API_URL")
                .global(true)
                .value_parser(validator_url()),
        )
        .arg(
            Arg::new(ARG_STATE_FILE)
                .long(ARG_STATE_FILE)
                .help("Session state file (default: <data dir>/hrdesk/state.json)")
                .env("HRDESK_STATE_FILE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .default_value("10")
                .env("HRDESK_TIMEOUT")
                .global(true)
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_REVALIDATE_INTERVAL)
                .long(ARG_REVALIDATE_INTERVAL)
                .help("Seconds between credential expiry checks of a live session")
                .default_value("300")
                .env("HRDESK_REVALIDATE_INTERVAL")
                .global(true)
                .value_parser(value_parser!(u64).range(1..)),
        )
        .subcommand(
            Command::new("login")
                .about("Authenticate and store the session")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('u')
                        .long(ARG_USERNAME)
                        .help("Username")
                        .env("HRDESK_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long(ARG_PASSWORD)
                        .help("Password")
                        .env("HRDESK_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Discard the stored session"))
        .subcommand(Command::new("whoami").about("Show the current session"))
        .subcommand(
            Command::new("list")
                .about("List records")
                .arg(
                    Arg::new(ARG_RESOURCE)
                        .help("What to list")
                        .required(true)
                        .value_parser(RESOURCES),
                )
                .arg(
                    Arg::new(ARG_STATUS)
                        .long(ARG_STATUS)
                        .help("Candidate status filter, e.g. PENDING"),
                )
                .arg(
                    Arg::new(ARG_EMPLOYEE)
                        .long(ARG_EMPLOYEE)
                        .help("Narrow history to one employee id"),
                ),
        )
        .subcommand(
            Command::new("candidate")
                .about("Candidate review actions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("accept")
                        .about("Hire a candidate as an employee")
                        .arg(Arg::new(ARG_ID).required(true))
                        .arg(
                            Arg::new(ARG_DEPARTMENT)
                                .long(ARG_DEPARTMENT)
                                .help("Department id")
                                .required(true),
                        )
                        .arg(
                            Arg::new(ARG_POSITION)
                                .long(ARG_POSITION)
                                .help("Position id")
                                .required(true),
                        )
                        .arg(
                            Arg::new(ARG_SALARY)
                                .long(ARG_SALARY)
                                .help("Starting salary")
                                .required(true)
                                .value_parser(value_parser!(f64)),
                        )
                        .arg(
                            Arg::new(ARG_EMPLOYEE_STATUS)
                                .long(ARG_EMPLOYEE_STATUS)
                                .help("Employment status")
                                .default_value("working")
                                .value_parser(["working", "probation", "fired"]),
                        ),
                )
                .subcommand(
                    Command::new("reject")
                        .about("Reject a candidate")
                        .arg(Arg::new(ARG_ID).required(true)),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a candidate")
                        .arg(Arg::new(ARG_ID).required(true)),
                ),
        )
        .subcommand(
            Command::new("theme").about("Show or change the theme").arg(
                Arg::new(ARG_MODE)
                    .help("New theme")
                    .value_parser(["light", "dark", "toggle"]),
            ),
        )
        .subcommand(
            Command::new("watch")
                .about("Keep the session live and report transitions until it ends")
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Only print the final transition")
                        .action(ArgAction::SetTrue),
                ),
        );

    logging::with_args(command)
}
