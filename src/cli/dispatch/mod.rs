use crate::cli::{
    actions::{
        candidate::{self, CandidateAction, Hire},
        list::{self, Resource},
        login, theme, watch, Action,
    },
    commands::{
        ARG_API_URL, ARG_DEPARTMENT, ARG_EMPLOYEE, ARG_EMPLOYEE_STATUS, ARG_ID, ARG_MODE,
        ARG_PASSWORD, ARG_POSITION, ARG_RESOURCE, ARG_REVALIDATE_INTERVAL, ARG_SALARY,
        ARG_STATE_FILE, ARG_STATUS, ARG_TIMEOUT, ARG_USERNAME,
    },
    globals::GlobalArgs,
};
use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = global_args(matches)?;

    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login(login::Args {
            globals,
            username: sub_m
                .get_one::<String>(ARG_USERNAME)
                .cloned()
                .context("missing required argument: --username")?,
            password: sub_m
                .get_one::<String>(ARG_PASSWORD)
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?,
        })),
        Some(("logout", _)) => Ok(Action::Logout(globals)),
        Some(("whoami", _)) => Ok(Action::Whoami(globals)),
        Some(("list", sub_m)) => {
            let resource: Resource = sub_m
                .get_one::<String>(ARG_RESOURCE)
                .context("missing required argument: resource")?
                .parse()?;

            Ok(Action::List(list::Args {
                globals,
                resource,
                status: sub_m.get_one::<String>(ARG_STATUS).cloned(),
                employee: sub_m.get_one::<String>(ARG_EMPLOYEE).cloned(),
            }))
        }
        Some(("candidate", sub_m)) => {
            let (action, id) = match sub_m.subcommand() {
                Some(("accept", args)) => (CandidateAction::Accept(hire(args)?), args),
                Some(("reject", args)) => (CandidateAction::Reject, args),
                Some(("delete", args)) => (CandidateAction::Delete, args),
                _ => bail!("unknown candidate action"),
            };

            Ok(Action::Candidate(candidate::Args {
                globals,
                action,
                id: id
                    .get_one::<String>(ARG_ID)
                    .cloned()
                    .context("missing required argument: id")?,
            }))
        }
        Some(("theme", sub_m)) => Ok(Action::Theme(theme::Args {
            globals,
            mode: sub_m.get_one::<String>(ARG_MODE).map(|mode| mode.parse()).transpose()?,
        })),
        Some(("watch", sub_m)) => Ok(Action::Watch(watch::Args {
            globals,
            quiet: sub_m.get_flag("quiet"),
        })),
        _ => bail!("no command given, see --help"),
    }
}

fn hire(matches: &clap::ArgMatches) -> Result<Hire> {
    Ok(Hire {
        department: matches
            .get_one::<String>(ARG_DEPARTMENT)
            .cloned()
            .context("missing required argument: --department")?,
        position: matches
            .get_one::<String>(ARG_POSITION)
            .cloned()
            .context("missing required argument: --position")?,
        salary: matches
            .get_one::<f64>(ARG_SALARY)
            .copied()
            .context("missing required argument: --salary")?,
        status: matches
            .get_one::<String>(ARG_EMPLOYEE_STATUS)
            .map(|status| status.parse())
            .transpose()
            .map_err(|err: String| anyhow::anyhow!(err))?
            .unwrap_or_default(),
    })
}

fn global_args(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;

    let state_file = match matches.get_one::<String>(ARG_STATE_FILE) {
        Some(path) => PathBuf::from(path),
        None => GlobalArgs::default_state_file()?,
    };

    let mut globals = GlobalArgs::new(api_url, state_file);

    if let Some(timeout) = matches.get_one::<u64>(ARG_TIMEOUT) {
        globals.timeout = Duration::from_secs(*timeout);
    }

    if let Some(interval) = matches.get_one::<u64>(ARG_REVALIDATE_INTERVAL) {
        globals.revalidate_interval = Duration::from_secs(*interval);
    }

    Ok(globals)
}
