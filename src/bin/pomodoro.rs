//! Terminal Pomodoro timer. Finished intervals are logged to a StudySync
//! server.
//!
//! Commands (one per line): `start`, `pause`, empty line to toggle, `reset`,
//! `skip`, `work|short|long <minutes>`, `quit`.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use studysync::config::parse_var;
use studysync::models::Mode;
use studysync::timer::{format_remaining, Durations, HttpSessionLogger, TimerCommand, TimerController, TimerEffect};

fn parse_command(line: &str) -> Option<TimerCommand> {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        None => TimerCommand::Toggle,
        Some("start") => TimerCommand::Start,
        Some("pause") => TimerCommand::Pause,
        Some("reset") => TimerCommand::Reset,
        Some("skip") => TimerCommand::Skip,
        Some("quit") | Some("exit") => TimerCommand::Shutdown,
        Some(name @ ("work" | "short" | "long")) => {
            let mode = match name {
                "work" => Mode::Work,
                "short" => Mode::Short,
                _ => Mode::Long,
            };
            let minutes = parts.next()?.parse().ok()?;
            TimerCommand::SetDuration { mode, minutes }
        }
        Some(_) => return None,
    };
    Some(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let api_url = std::env::var("STUDYSYNC_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let user_id: i64 = std::env::var("STUDYSYNC_USER_ID")
        .context("STUDYSYNC_USER_ID must be set")?
        .parse()
        .context("STUDYSYNC_USER_ID must be a number")?;
    let durations = Durations::new(
        parse_var("POMODORO_WORK_MINUTES", 25)?,
        parse_var("POMODORO_SHORT_MINUTES", 5)?,
        parse_var("POMODORO_LONG_MINUTES", 15)?,
    )?;

    let logger = HttpSessionLogger::new(&api_url);
    info!("Logging sessions for user {} to {}", user_id, logger.endpoint());

    let controller = TimerController::new(user_id, durations, logger);
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(line.trim()) {
                Some(command) => {
                    let shutdown = command == TimerCommand::Shutdown;
                    if tx.send(command).await.is_err() || shutdown {
                        break;
                    }
                }
                None => eprintln!("unknown command: {}", line.trim()),
            }
        }
    });

    println!("Pomodoro ready. Press Enter to start or pause, type `quit` to leave.");
    let controller = controller
        .run(Duration::from_secs(1), rx, |engine, effects| {
            for effect in effects {
                if let TimerEffect::ModeChanged { to, .. } = effect {
                    let label = if to.is_break() { "Break" } else { "Focus" };
                    println!("\n{} time! ({})", label, to);
                }
            }
            let state = if engine.is_running() { "running" } else { "paused" };
            print!(
                "\r[{}] {} ({}, {} done)   ",
                engine.mode(),
                format_remaining(engine.remaining_seconds()),
                state,
                engine.completed_work_count()
            );
            let _ = std::io::stdout().flush();
        })
        .await;

    println!("\nCompleted {} work intervals.", controller.engine().completed_work_count());
    // Give in-flight submissions a moment to finish.
    tokio::time::sleep(Duration::from_millis(500)).await;
    Ok(())
}
