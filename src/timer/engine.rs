//! Pomodoro countdown state machine.
//!
//! The engine owns no clock and no thread. Callers feed it [`TimerEvent`]s
//! together with the current time; every transition returns the effects the
//! caller must carry out (logging a finished interval, announcing a mode
//! change). One `Tick` stands for one elapsed second.
//!
//! ```text
//! work -> short -> work -> short -> work -> short -> work -> long -> work ...
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Mode, NewPomodoroSession};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_MINUTES: u32 = 5;
pub const DEFAULT_LONG_MINUTES: u32 = 15;

/// Longest accepted interval, one day.
pub const MAX_MINUTES: u32 = 24 * 60;

/// Every n-th completed work interval is followed by a long break.
pub const LONG_BREAK_EVERY: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("{mode} duration must be between 1 and 1440 minutes")]
    InvalidDuration { mode: Mode },
}

/// Configured length of each mode, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    work_minutes: u32,
    short_minutes: u32,
    long_minutes: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_minutes: DEFAULT_SHORT_MINUTES,
            long_minutes: DEFAULT_LONG_MINUTES,
        }
    }
}

impl Durations {
    pub fn new(work_minutes: u32, short_minutes: u32, long_minutes: u32) -> Result<Self, TimerError> {
        let mut durations = Self::default();
        durations.set(Mode::Work, work_minutes)?;
        durations.set(Mode::Short, short_minutes)?;
        durations.set(Mode::Long, long_minutes)?;
        Ok(durations)
    }

    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::Short => self.short_minutes,
            Mode::Long => self.long_minutes,
        }
    }

    pub fn seconds(&self, mode: Mode) -> u32 {
        self.minutes(mode).saturating_mul(60)
    }

    fn set(&mut self, mode: Mode, minutes: u32) -> Result<(), TimerError> {
        if minutes == 0 || minutes > MAX_MINUTES {
            return Err(TimerError::InvalidDuration { mode });
        }
        match mode {
            Mode::Work => self.work_minutes = minutes,
            Mode::Short => self.short_minutes = minutes,
            Mode::Long => self.long_minutes = minutes,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Pause,
    Toggle,
    /// One second of wall-clock time has passed.
    Tick,
    Reset,
    /// Abandon the current interval without logging it.
    Skip,
    SetDuration { mode: Mode, minutes: u32 },
}

/// A finished interval, before it is attributed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub mode: Mode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: i64,
}

impl CompletedSession {
    pub fn for_user(self, user_id: i64) -> NewPomodoroSession {
        NewPomodoroSession {
            user_id,
            mode: self.mode,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_seconds: self.duration_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEffect {
    /// Submit the finished interval. Emitted exactly once per interval.
    LogSession(CompletedSession),
    ModeChanged { from: Mode, to: Mode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEngine {
    durations: Durations,
    mode: Mode,
    remaining_seconds: u32,
    /// Length of the interval in flight, fixed when it was entered.
    interval_seconds: u32,
    running: bool,
    completed_work_count: u32,
    /// When the current interval first started running.
    interval_started_at: Option<DateTime<Utc>>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

impl TimerEngine {
    /// A reset, paused engine in work mode.
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            mode: Mode::Work,
            remaining_seconds: durations.seconds(Mode::Work),
            interval_seconds: durations.seconds(Mode::Work),
            running: false,
            completed_work_count: 0,
            interval_started_at: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_count(&self) -> u32 {
        self.completed_work_count
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Applies one event and returns the effects it produced.
    pub fn apply(&mut self, event: TimerEvent, now: DateTime<Utc>) -> Result<Vec<TimerEffect>, TimerError> {
        let effects = match event {
            TimerEvent::Start => {
                self.start(now);
                Vec::new()
            }
            TimerEvent::Pause => {
                self.pause();
                Vec::new()
            }
            TimerEvent::Toggle => {
                if self.running {
                    self.pause();
                } else {
                    self.start(now);
                }
                Vec::new()
            }
            TimerEvent::Tick => self.tick(now),
            TimerEvent::Reset => {
                self.reset();
                Vec::new()
            }
            TimerEvent::Skip => self.skip(now),
            TimerEvent::SetDuration { mode, minutes } => {
                self.set_duration(mode, minutes)?;
                Vec::new()
            }
        };
        Ok(effects)
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.running = true;
        if self.interval_started_at.is_none() {
            self.interval_started_at = Some(now);
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<TimerEffect> {
        if !self.running {
            return Vec::new();
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Vec::new();
        }
        self.complete_interval(now)
    }

    pub fn reset(&mut self) {
        self.mode = Mode::Work;
        self.remaining_seconds = self.durations.seconds(Mode::Work);
        self.interval_seconds = self.remaining_seconds;
        self.running = false;
        self.completed_work_count = 0;
        self.interval_started_at = None;
    }

    /// Leaves the current interval early. Nothing is logged and the work
    /// count is untouched, so skipping work always leads to a short break.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Vec<TimerEffect> {
        let from = self.mode;
        let to = if from == Mode::Work { Mode::Short } else { Mode::Work };
        self.enter(to, now);
        vec![TimerEffect::ModeChanged { from, to }]
    }

    /// Changes a mode's length. A paused engine rebases the active countdown
    /// right away; a running one picks the new value up on the next mode entry.
    pub fn set_duration(&mut self, mode: Mode, minutes: u32) -> Result<(), TimerError> {
        self.durations.set(mode, minutes)?;
        if !self.running && mode == self.mode {
            self.remaining_seconds = self.durations.seconds(mode);
            self.interval_seconds = self.remaining_seconds;
            self.interval_started_at = None;
        }
        Ok(())
    }

    fn complete_interval(&mut self, now: DateTime<Utc>) -> Vec<TimerEffect> {
        let finished = self.mode;
        let duration_seconds = i64::from(self.interval_seconds);
        let start_time = self
            .interval_started_at
            .unwrap_or_else(|| now - Duration::seconds(duration_seconds));

        if finished == Mode::Work {
            self.completed_work_count += 1;
        }
        let next = self.next_mode();
        self.enter(next, now);

        vec![
            TimerEffect::LogSession(CompletedSession {
                mode: finished,
                start_time,
                end_time: now,
                duration_seconds,
            }),
            TimerEffect::ModeChanged { from: finished, to: next },
        ]
    }

    fn next_mode(&self) -> Mode {
        match self.mode {
            Mode::Work if self.completed_work_count % LONG_BREAK_EVERY == 0 => Mode::Long,
            Mode::Work => Mode::Short,
            Mode::Short | Mode::Long => Mode::Work,
        }
    }

    fn enter(&mut self, mode: Mode, now: DateTime<Utc>) {
        self.mode = mode;
        self.remaining_seconds = self.durations.seconds(mode);
        self.interval_seconds = self.remaining_seconds;
        self.interval_started_at = self.running.then_some(now);
    }
}

/// `MM:SS`, as shown on the timer face.
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
