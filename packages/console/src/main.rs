//! Console front end for the print queue.
//!
//! Reads a command script from a file (or stdin), runs it against a queue
//! hosted by the actor supervisor and prints every event it produces.

use std::error::Error;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use actors::{ActorRef, QueueMessage, SupervisorMessage, client, start_supervisor};
use clap::Parser;
use print_queue_core::{JobId, QueueConfig, QueueError};

mod command;
mod render;

use command::{Command, parse_script};
use render::Format;

const EXPIRY_THRESHOLD_VAR: &str = "PRINT_QUEUE_EXPIRY_THRESHOLD";

#[derive(Parser, Debug)]
#[command(name = "print-queue")]
#[command(about = "Discrete-time print queue simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Command script to run (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Emit one JSON object per line instead of text
    #[arg(long)]
    json: bool,

    /// Name of the queue created for this run
    #[arg(long, default_value = "default")]
    queue: String,

    /// Override PRINT_QUEUE_EXPIRY_THRESHOLD
    #[arg(long, allow_hyphen_values = true)]
    expiry_threshold: Option<i64>,

    /// Log level for diagnostics on stderr
    #[arg(long, env = "PRINT_QUEUE_LOG", default_value = "warn")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.expiry_threshold, |name| std::env::var(name).ok())?;

    let script = read_script(cli.script.as_deref())?;
    let commands = parse_script(&script)?;
    tracing::debug!("Parsed {} commands", commands.len());

    let format = if cli.json { Format::Json } else { Format::Text };

    let (supervisor, handle) = start_supervisor(config.event_buffer).await?;
    let result = run(&supervisor, &cli.queue, config, &commands, format, &mut std::io::stdout()).await;

    supervisor.send_message(SupervisorMessage::Shutdown)?;
    handle.await?;
    result
}

/// Read the queue config, letting `--expiry-threshold` replace the
/// environment value before anything is validated.
fn load_config<F>(expiry_threshold: Option<i64>, lookup: F) -> Result<QueueConfig, QueueError>
where
    F: Fn(&str) -> Option<String>,
{
    let threshold = expiry_threshold.map(|t| t.to_string());
    QueueConfig::from_lookup(|name| match (name, &threshold) {
        (EXPIRY_THRESHOLD_VAR, Some(value)) => Some(value.clone()),
        _ => lookup(name),
    })
}

fn read_script(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut script = String::new();
            std::io::stdin().read_to_string(&mut script)?;
            Ok(script)
        }
    }
}

/// Create the queue and run every command against it.
async fn run(
    supervisor: &ActorRef<SupervisorMessage>,
    name: &str,
    config: QueueConfig,
    commands: &[Command],
    format: Format,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let queue = client::create_queue(supervisor, name, config).await?;
    for command in commands {
        execute(&queue, command, format, out).await?;
    }
    out.flush()?;
    Ok(())
}

async fn execute(
    queue: &ActorRef<QueueMessage>,
    command: &Command,
    format: Format,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Submit {
            user,
            job,
            priority,
        } => {
            let event = client::submit(queue, user.as_str(), job.as_str(), *priority).await?;
            writeln!(out, "{}", format.submitted(&event)?)?;
        }
        Command::Tick { count } => {
            for _ in 0..*count {
                let outcome = client::advance(queue).await?;
                writeln!(out, "{}", format.tick(&outcome.tick)?)?;
                for expired in &outcome.expired {
                    writeln!(out, "{}", format.expired(expired)?)?;
                }
            }
        }
        Command::Status => {
            let lines = client::snapshot(queue).await?;
            for line in format.status(&lines)? {
                writeln!(out, "{line}")?;
            }
        }
        Command::Stats => {
            let stats = client::stats(queue).await?;
            for line in format.stats(&stats)? {
                writeln!(out, "{line}")?;
            }
        }
        Command::Find { job } => {
            let job_id = JobId::from(job.as_str());
            let found = client::find_job(queue, job_id.clone()).await?;
            writeln!(out, "{}", format.found(&job_id, found.as_ref())?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    async fn run_text(script: &str, threshold: i64) -> Result<String, Box<dyn Error>> {
        let commands = parse_script(script)?;
        let (supervisor, handle) = start_supervisor(64).await?;
        let mut out = Vec::new();
        run(
            &supervisor,
            "test",
            QueueConfig::with_threshold(threshold),
            &commands,
            Format::Text,
            &mut out,
        )
        .await?;
        supervisor.send_message(SupervisorMessage::Shutdown)?;
        handle.await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn renders_the_expiry_walkthrough() -> Result<(), Box<dyn Error>> {
        let output = run_text(
            "submit alice J1 5\nstatus\ntick 10\nstatus\ntick\nstatus\n",
            10,
        )
        .await?;
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Enqueued: (User: alice, Job: J1, Priority: 5)");
        assert_eq!(lines[1], "Queue Status:");
        assert_eq!(lines[2], "  (User: alice, Job: J1, Priority: 5, Waiting: 0 ticks)");
        assert_eq!(lines[3], "Tick: clock = 1");
        assert_eq!(lines[12], "Tick: clock = 10");
        assert_eq!(lines[13], "Queue Status:");
        assert_eq!(lines[14], "  (User: alice, Job: J1, Priority: 5, Waiting: 10 ticks)");
        assert_eq!(lines[15], "Tick: clock = 11");
        assert_eq!(lines[16], "Expired: (User: alice, Job: J1, Waited: 11 ticks)");
        assert_eq!(&lines[17..], &["Queue Status:", "  Empty"]);
        Ok(())
    }

    #[tokio::test]
    async fn priority_does_not_reorder_output() -> Result<(), Box<dyn Error>> {
        let output = run_text("submit bob J2 1\nsubmit carol J3 9\nstatus\nfind J3\n", 10).await?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[3], "  (User: bob, Job: J2, Priority: 1, Waiting: 0 ticks)");
        assert_eq!(lines[4], "  (User: carol, Job: J3, Priority: 9, Waiting: 0 ticks)");
        assert!(lines[5].starts_with("Found: (User: carol"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_threshold_fails_the_run() -> Result<(), Box<dyn Error>> {
        let result = run_text("status\n", -1).await;
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn cli_threshold_overrides_a_bad_environment() -> Result<(), Box<dyn Error>> {
        let env = |name: &str| match name {
            EXPIRY_THRESHOLD_VAR => Some("-1".to_string()),
            "PRINT_QUEUE_EVENT_BUFFER" => Some("32".to_string()),
            _ => None,
        };

        let config = load_config(Some(5), env)?;
        assert_eq!(config.expiry_threshold, 5);
        assert_eq!(config.event_buffer, 32);

        assert!(matches!(
            load_config(None, env),
            Err(QueueError::InvalidConfiguration(_))
        ));
        Ok(())
    }

    #[test]
    fn reads_scripts_from_files() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("demo.queue");
        std::fs::write(&path, "submit dave J4 3\ntick\n")?;
        let script = read_script(Some(&path))?;
        assert_eq!(parse_script(&script)?.len(), 2);
        Ok(())
    }

    #[test]
    fn cli_accepts_negative_threshold_override() {
        let cli = Cli::parse_from(["print-queue", "--expiry-threshold", "-2", "--json"]);
        assert_eq!(cli.expiry_threshold, Some(-2));
        assert!(cli.json);
        assert!(cli.script.is_none());
    }
}
