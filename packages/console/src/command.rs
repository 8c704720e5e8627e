//! Command script parsing.
//!
//! One command per line; `#` starts a comment and blank lines are skipped.
//!
//! ```text
//! submit <user> <job> <priority>
//! tick [count]
//! status
//! stats
//! find <job>
//! ```

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit {
        user: String,
        job: String,
        priority: i32,
    },
    Tick {
        count: u64,
    },
    Status,
    Stats,
    Find {
        job: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("line {line}: unknown command '{word}'")]
    Unknown { line: usize, word: String },

    #[error("line {line}: '{command}' is missing <{argument}>")]
    MissingArgument {
        line: usize,
        command: &'static str,
        argument: &'static str,
    },

    #[error("line {line}: '{value}' is not a valid {expected}")]
    InvalidNumber {
        line: usize,
        value: String,
        expected: &'static str,
    },

    #[error("line {line}: too many arguments for '{command}'")]
    TooManyArguments { line: usize, command: &'static str },
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(script: &str) -> Result<Vec<Command>, CommandError> {
    let mut commands = Vec::new();
    for (idx, raw) in script.lines().enumerate() {
        if let Some(cmd) = parse_line(idx + 1, raw)? {
            commands.push(cmd);
        }
    }
    Ok(commands)
}

/// Parse one line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, CommandError> {
    let content = match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let mut words = content.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "submit" => {
            let user = required(&mut words, line, "submit", "user")?;
            let job = required(&mut words, line, "submit", "job")?;
            let priority = required(&mut words, line, "submit", "priority")?;
            let priority = priority
                .parse::<i32>()
                .map_err(|_| CommandError::InvalidNumber {
                    line,
                    value: priority.clone(),
                    expected: "priority",
                })?;
            (
                "submit",
                Command::Submit {
                    user,
                    job,
                    priority,
                },
            )
        }
        "tick" => {
            let count = match words.next() {
                Some(value) => value
                    .parse::<u64>()
                    .map_err(|_| CommandError::InvalidNumber {
                        line,
                        value: value.to_string(),
                        expected: "tick count",
                    })?,
                None => 1,
            };
            ("tick", Command::Tick { count })
        }
        "status" => ("status", Command::Status),
        "stats" => ("stats", Command::Stats),
        "find" => {
            let job = required(&mut words, line, "find", "job")?;
            ("find", Command::Find { job })
        }
        _ => {
            return Err(CommandError::Unknown {
                line,
                word: word.to_string(),
            });
        }
    };

    let (name, command) = command;
    if words.next().is_some() {
        return Err(CommandError::TooManyArguments {
            line,
            command: name,
        });
    }
    Ok(Some(command))
}

fn required<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    line: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    words
        .next()
        .map(str::to_string)
        .ok_or(CommandError::MissingArgument {
            line,
            command,
            argument,
        })
}
