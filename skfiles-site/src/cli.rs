use std::{env, net::SocketAddr, path::PathBuf, process, str::FromStr};

use getopts::{Matches, Options};

use skfiles_calendar::WeekStart;

use crate::{calendar::CalendarMode, contact::DEFAULT_RELAY};

pub struct Args {
    pub address: SocketAddr,
    /// JSON content file; the bundled sample when unset.
    pub content: Option<PathBuf>,
    pub relay: String,
    pub calendar_mode: CalendarMode,
    pub week_start: WeekStart,
}

pub enum Parsed {
    Run(Args),
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080] [Env: SKFILES_ADDR]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "c",
        "content",
        "JSON file with posts, categories and seed events [Default: bundled sample] [Env: SKFILES_CONTENT]",
        "PATH",
    );
    opts.optopt(
        "r",
        "relay",
        "Endpoint contact messages are posted to [Env: SKFILES_RELAY]",
        "URL",
    );
    opts.optopt(
        "m",
        "calendar-mode",
        "Who owns the calendar events: controlled or self-contained [Default: controlled] [Env: SKFILES_CALENDAR_MODE]",
        "MODE",
    );
    opts.optopt(
        "w",
        "week-start",
        "First column of the calendar: sunday or monday [Default: sunday] [Env: SKFILES_WEEK_START]",
        "DAY",
    );
    opts
}

/// Command line value, else environment variable.
fn lookup<F>(matches: &Matches, name: &str, var: &str, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    matches.opt_str(name).or_else(|| env(var))
}

fn value<T, F>(matches: &Matches, name: &str, var: &str, env: &F, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    match lookup(matches, name, var, env) {
        Some(raw) => raw.parse().map_err(|err: T::Err| {
            format!("Provided value for option '{name}' is invalid: {}", err.to_string())
        }),
        None => Ok(default),
    }
}

pub fn try_parse<F>(args: Vec<String>, env: F) -> Result<Parsed, String>
where
    F: Fn(&str) -> Option<String>,
{
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Parsed::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    Ok(Parsed::Run(Args {
        address: value(
            &matches,
            "address",
            "SKFILES_ADDR",
            &env,
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )?,
        content: lookup(&matches, "content", "SKFILES_CONTENT", &env).map(PathBuf::from),
        relay: lookup(&matches, "relay", "SKFILES_RELAY", &env)
            .unwrap_or_else(|| DEFAULT_RELAY.to_string()),
        calendar_mode: value(
            &matches,
            "calendar-mode",
            "SKFILES_CALENDAR_MODE",
            &env,
            CalendarMode::default(),
        )?,
        week_start: value(
            &matches,
            "week-start",
            "SKFILES_WEEK_START",
            &env,
            WeekStart::default(),
        )?,
    }))
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args, |var| env::var(var).ok()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn run(args: &[&str], env: &[(&str, &str)]) -> Result<Args, String> {
        let env = env
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        let args = args.iter().map(ToString::to_string).collect();

        match try_parse(args, |var| env.get(var).cloned())? {
            Parsed::Run(args) => Ok(args),
            Parsed::Help(_) => Err("help".into()),
        }
    }

    #[test]
    fn test_defaults() {
        let args = run(&[], &[]).unwrap();

        assert_eq!(args.address, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(args.content, None);
        assert_eq!(args.relay, DEFAULT_RELAY);
        assert_eq!(args.calendar_mode, CalendarMode::Controlled);
        assert_eq!(args.week_start, WeekStart::Sunday);
    }

    #[test]
    fn test_flags_win_over_environment() {
        let args = run(
            &["-a", "0.0.0.0:3000", "--calendar-mode", "self-contained"],
            &[
                ("SKFILES_ADDR", "127.0.0.1:9000"),
                ("SKFILES_WEEK_START", "monday"),
                ("SKFILES_CONTENT", "posts.json"),
            ],
        )
        .unwrap();

        assert_eq!(args.address, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(args.calendar_mode, CalendarMode::SelfContained);
        assert_eq!(args.week_start, WeekStart::Monday);
        assert_eq!(args.content, Some(PathBuf::from("posts.json")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(run(&["--address", "localhost"], &[]).is_err());
        assert!(run(&[], &[("SKFILES_WEEK_START", "friday")]).is_err());
        assert!(run(&["--unknown"], &[]).is_err());
        assert_eq!(run(&["-h"], &[]).err().as_deref(), Some("help"));
    }
}
