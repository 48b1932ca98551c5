use std::fmt;
use std::path::PathBuf;

use services::Timeframe;
use studio_core::ProblemQuery;
use studio_core::model::{Difficulty, ParseDifficultyError, ParseIdError, ProblemId};

pub const DEFAULT_DB_URL: &str = "sqlite://studio.sqlite3";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArg { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidSwitch { raw: String },
    InvalidTimeframe { raw: String },
    InvalidSeed { raw: String },
    InvalidValue(studio_core::Error),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArg { command, name } => write!(f, "{command}: missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSwitch { raw } => write!(f, "expected on or off, got: {raw}"),
            ArgsError::InvalidTimeframe { raw } => write!(f, "invalid --timeframe value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidValue(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ParseIdError> for ArgsError {
    fn from(err: ParseIdError) -> Self {
        ArgsError::InvalidValue(err.into())
    }
}

impl From<ParseDifficultyError> for ArgsError {
    fn from(err: ParseDifficultyError) -> Self {
        ArgsError::InvalidValue(err.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    NewLessons,
    ProgressReport,
    CommunityActivity,
}

impl NotificationKind {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "new-lessons" => Some(Self::NewLessons),
            "progress-report" => Some(Self::ProgressReport),
            "community-activity" => Some(Self::CommunityActivity),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Command {
    Login {
        name: String,
        email: String,
        token: String,
        photo: Option<String>,
    },
    Logout,
    Whoami,
    Progress {
        course: Option<String>,
    },
    ToggleLesson {
        course: String,
        lesson: String,
    },
    Complete {
        course: String,
    },
    Profile {
        name: String,
        bio: String,
        photo: Option<String>,
    },
    Notify {
        change: Option<(NotificationKind, bool)>,
    },
    Badges,
    Roadmap {
        path: String,
    },
    Problems(ProblemQuery),
    Run {
        problem: ProblemId,
    },
    Submit {
        problem: ProblemId,
        code_file: PathBuf,
    },
    Ask {
        course: String,
        question: String,
    },
    Hint {
        problem: ProblemId,
        code_file: Option<PathBuf>,
    },
    Explain {
        problem: ProblemId,
    },
    Leaderboard {
        timeframe: Timeframe,
        seed: Option<u64>,
    },
}

#[derive(Debug)]
pub struct Args {
    pub db_url: String,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  studio [--db <sqlite_url>] <command> [args]");
    eprintln!();
    eprintln!("Session:");
    eprintln!("  login <name> <email> <token> [--photo <url>]");
    eprintln!("  logout");
    eprintln!("  whoami");
    eprintln!("  profile <name> <bio> [--photo <url>]   # --photo \"\" clears the photo");
    eprintln!();
    eprintln!("Progress:");
    eprintln!("  progress [<course-id>]");
    eprintln!("  toggle-lesson <course-id> <lesson-id>");
    eprintln!("  complete <course-id>");
    eprintln!("  notify [new-lessons|progress-report|community-activity <on|off>]");
    eprintln!("  badges");
    eprintln!("  roadmap <path-id>");
    eprintln!();
    eprintln!("Practice:");
    eprintln!("  problems [--difficulty <easy|medium|hard>] [--language <lang>] [--search <text>]");
    eprintln!("  run <problem-id>");
    eprintln!("  submit <problem-id> <code-file>");
    eprintln!("  leaderboard [--timeframe <all-time|this-month|this-week>] [--seed <n>]");
    eprintln!();
    eprintln!("AI tutor:");
    eprintln!("  ask <course-id> <question...>");
    eprintln!("  hint <problem-id> [--code <file>]");
    eprintln!("  explain <problem-id>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDIO_DB_URL, STUDIO_LOG, STUDIO_LOG_FORMAT,");
    eprintln!("  STUDIO_AI_API_KEY, STUDIO_AI_BASE_URL, STUDIO_AI_MODEL");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Positional arguments and `--flag value` pairs of one subcommand.
struct Rest {
    command: &'static str,
    positional: std::vec::IntoIter<String>,
    flags: Vec<(String, String)>,
}

impl Rest {
    fn collect(
        command: &'static str,
        args: impl Iterator<Item = String>,
        known_flags: &[&'static str],
    ) -> Result<Self, ArgsError> {
        let mut args = args;
        let mut positional = Vec::new();
        let mut flags = Vec::new();
        while let Some(arg) = args.next() {
            if let Some(&flag) = known_flags.iter().find(|flag| **flag == arg.as_str()) {
                let value = require_value(&mut args, flag)?;
                flags.push((arg, value));
            } else if arg.starts_with("--") {
                return Err(ArgsError::UnknownArg(arg));
            } else {
                positional.push(arg);
            }
        }
        Ok(Self {
            command,
            positional: positional.into_iter(),
            flags,
        })
    }

    fn next(&mut self, name: &'static str) -> Result<String, ArgsError> {
        self.positional.next().ok_or(ArgsError::MissingArg {
            command: self.command,
            name,
        })
    }

    fn optional(&mut self) -> Option<String> {
        self.positional.next()
    }

    fn remaining(&mut self) -> Vec<String> {
        self.positional.by_ref().collect()
    }

    fn flag(&self, flag: &str) -> Option<String> {
        self.flags
            .iter()
            .rev()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.clone())
    }

    fn finish(mut self) -> Result<(), ArgsError> {
        match self.positional.next() {
            Some(extra) => Err(ArgsError::UnknownArg(extra)),
            None => Ok(()),
        }
    }
}

impl Args {
    /// Parse `argv` (without the program name).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("STUDIO_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);

        let mut args = argv.into_iter();
        let command = loop {
            let Some(arg) = args.next() else {
                return Ok(None);
            };
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" | "help" => return Ok(None),
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => break parse_command(&arg, args)?,
            }
        };

        Ok(Some(Self { db_url, command }))
    }
}

fn parse_command(name: &str, args: impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let command = match name {
        "login" => {
            let mut rest = Rest::collect("login", args, &["--photo"])?;
            let command = Command::Login {
                name: rest.next("name")?,
                email: rest.next("email")?,
                token: rest.next("token")?,
                photo: rest.flag("--photo"),
            };
            rest.finish()?;
            command
        }
        "logout" => {
            Rest::collect("logout", args, &[])?.finish()?;
            Command::Logout
        }
        "whoami" => {
            Rest::collect("whoami", args, &[])?.finish()?;
            Command::Whoami
        }
        "progress" => {
            let mut rest = Rest::collect("progress", args, &[])?;
            let course = rest.optional();
            rest.finish()?;
            Command::Progress { course }
        }
        "toggle-lesson" => {
            let mut rest = Rest::collect("toggle-lesson", args, &[])?;
            let command = Command::ToggleLesson {
                course: rest.next("course-id")?,
                lesson: rest.next("lesson-id")?,
            };
            rest.finish()?;
            command
        }
        "complete" => {
            let mut rest = Rest::collect("complete", args, &[])?;
            let course = rest.next("course-id")?;
            rest.finish()?;
            Command::Complete { course }
        }
        "profile" => {
            let mut rest = Rest::collect("profile", args, &["--photo"])?;
            let command = Command::Profile {
                name: rest.next("name")?,
                bio: rest.next("bio")?,
                photo: rest.flag("--photo"),
            };
            rest.finish()?;
            command
        }
        "notify" => {
            let mut rest = Rest::collect("notify", args, &[])?;
            let change = match rest.optional() {
                None => None,
                Some(kind) => {
                    let parsed = NotificationKind::from_arg(&kind)
                        .ok_or_else(|| ArgsError::UnknownArg(kind.clone()))?;
                    let switch = rest.next("on|off")?;
                    Some((parsed, parse_switch(&switch)?))
                }
            };
            rest.finish()?;
            Command::Notify { change }
        }
        "badges" => {
            Rest::collect("badges", args, &[])?.finish()?;
            Command::Badges
        }
        "roadmap" => {
            let mut rest = Rest::collect("roadmap", args, &[])?;
            let path = rest.next("path-id")?;
            rest.finish()?;
            Command::Roadmap { path }
        }
        "problems" => {
            let rest = Rest::collect("problems", args, &["--difficulty", "--language", "--search"])?;
            let difficulty = rest
                .flag("--difficulty")
                .map(|raw| raw.parse::<Difficulty>())
                .transpose()?;
            let query = ProblemQuery {
                difficulty,
                language: rest.flag("--language"),
                search: rest.flag("--search"),
            };
            rest.finish()?;
            Command::Problems(query)
        }
        "run" => {
            let mut rest = Rest::collect("run", args, &[])?;
            let problem = rest.next("problem-id")?.parse()?;
            rest.finish()?;
            Command::Run { problem }
        }
        "submit" => {
            let mut rest = Rest::collect("submit", args, &[])?;
            let command = Command::Submit {
                problem: rest.next("problem-id")?.parse()?,
                code_file: PathBuf::from(rest.next("code-file")?),
            };
            rest.finish()?;
            command
        }
        "ask" => {
            let mut rest = Rest::collect("ask", args, &[])?;
            let course = rest.next("course-id")?;
            let question = rest.remaining().join(" ");
            Command::Ask { course, question }
        }
        "hint" => {
            let mut rest = Rest::collect("hint", args, &["--code"])?;
            let command = Command::Hint {
                problem: rest.next("problem-id")?.parse()?,
                code_file: rest.flag("--code").map(PathBuf::from),
            };
            rest.finish()?;
            command
        }
        "explain" => {
            let mut rest = Rest::collect("explain", args, &[])?;
            let problem = rest.next("problem-id")?.parse()?;
            rest.finish()?;
            Command::Explain { problem }
        }
        "leaderboard" => {
            let rest = Rest::collect("leaderboard", args, &["--timeframe", "--seed"])?;
            let timeframe = match rest.flag("--timeframe") {
                Some(raw) => Timeframe::parse(&raw).ok_or(ArgsError::InvalidTimeframe { raw })?,
                None => Timeframe::AllTime,
            };
            let seed = rest
                .flag("--seed")
                .map(|raw| {
                    raw.parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: raw.clone() })
                })
                .transpose()?;
            rest.finish()?;
            Command::Leaderboard { timeframe, seed }
        }
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn parse_switch(raw: &str) -> Result<bool, ArgsError> {
    match raw {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(ArgsError::InvalidSwitch {
            raw: raw.to_string(),
        }),
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
