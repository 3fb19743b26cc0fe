//! Client-side Pomodoro timer: the countdown engine, the controller that
//! drives it, and the logger that reports finished intervals to the server.

pub mod controller;
pub mod engine;
pub mod logger;

pub use controller::{TimerCommand, TimerController};
pub use engine::{format_remaining, CompletedSession, Durations, TimerEffect, TimerEngine, TimerError, TimerEvent};
pub use logger::{HttpSessionLogger, LoggerError, SessionSink};
