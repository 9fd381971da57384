use std::fmt;

use spelling_core::model::{Grade, GradeError};

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingGrade,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidGrade(GradeError),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingGrade => write!(f, "a grade (1-5) is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidGrade(err) => write!(f, "{err}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  spelling stats                    [--db <sqlite_url>]");
    eprintln!("  spelling words <grade> [--refresh] [--db <sqlite_url>]");
    eprintln!("  spelling quiz <grade>             [--db <sqlite_url>]");
    eprintln!("  spelling reset [<grade>]          [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://spelling.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SPELLING_DB_URL, SPELLING_LOG");
    eprintln!("  SPELLING_AI_API_KEY, SPELLING_AI_BASE_URL, SPELLING_AI_MODEL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Stats,
    Words { grade: Grade, refresh: bool },
    Quiz { grade: Grade },
    Reset { grade: Option<Grade> },
    Help,
}

#[derive(Debug)]
pub struct Args {
    pub db_url: String,
    pub command: Command,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_grade(raw: &str) -> Result<Grade, ArgsError> {
    raw.parse().map_err(ArgsError::InvalidGrade)
}

impl Args {
    /// Parse `argv` (without the program name). `env_db_url` is the value of
    /// `SPELLING_DB_URL`, if set.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url.map_or_else(|| "sqlite://spelling.sqlite3".into(), normalize_sqlite_url);
        let mut positional = Vec::new();
        let mut refresh = false;

        let mut iter = argv.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut iter, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--refresh" => refresh = true,
                "--help" | "-h" => {
                    return Ok(Self {
                        db_url,
                        command: Command::Help,
                    });
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("stats") => Command::Stats,
            Some("words") => {
                let grade = parse_grade(&positional.next().ok_or(ArgsError::MissingGrade)?)?;
                Command::Words { grade, refresh }
            }
            Some("quiz") => {
                let grade = parse_grade(&positional.next().ok_or(ArgsError::MissingGrade)?)?;
                Command::Quiz { grade }
            }
            Some("reset") => {
                let grade = positional.next().as_deref().map(parse_grade).transpose()?;
                Command::Reset { grade }
            }
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self { db_url, command })
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
