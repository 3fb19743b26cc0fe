use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::engine::{Durations, TimerEffect, TimerEngine, TimerError, TimerEvent};
use super::logger::SessionSink;
use crate::models::Mode;

/// User input for a running controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    Skip,
    SetDuration { mode: Mode, minutes: u32 },
    Shutdown,
}

impl TimerCommand {
    fn into_event(self) -> Option<TimerEvent> {
        Some(match self {
            TimerCommand::Start => TimerEvent::Start,
            TimerCommand::Pause => TimerEvent::Pause,
            TimerCommand::Toggle => TimerEvent::Toggle,
            TimerCommand::Reset => TimerEvent::Reset,
            TimerCommand::Skip => TimerEvent::Skip,
            TimerCommand::SetDuration { mode, minutes } => TimerEvent::SetDuration { mode, minutes },
            TimerCommand::Shutdown => return None,
        })
    }
}

/// Owns a [`TimerEngine`] and carries out the effects it emits.
pub struct TimerController<S: SessionSink> {
    engine: TimerEngine,
    sink: S,
    user_id: i64,
}

impl<S: SessionSink> TimerController<S> {
    pub fn new(user_id: i64, durations: Durations, sink: S) -> Self {
        Self {
            engine: TimerEngine::new(durations),
            sink,
            user_id,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Applies `event` at the current wall-clock time and runs its effects.
    pub fn handle(&mut self, event: TimerEvent) -> Result<Vec<TimerEffect>, TimerError> {
        let effects = self.engine.apply(event, Utc::now())?;
        for effect in &effects {
            self.execute(effect);
        }
        Ok(effects)
    }

    fn execute(&self, effect: &TimerEffect) {
        match effect {
            TimerEffect::LogSession(session) => {
                info!(
                    "{} interval finished ({}s), submitting for user {}",
                    session.mode, session.duration_seconds, self.user_id
                );
                self.sink.dispatch(session.clone().for_user(self.user_id));
            }
            TimerEffect::ModeChanged { from, to } => info!("Switching from {} to {}", from, to),
        }
    }

    /// Drives the engine from a tick every `period` and from `commands` until
    /// `Shutdown` arrives or the sender is dropped. `observer` sees the engine
    /// after every handled event.
    pub async fn run<F>(mut self, period: Duration, mut commands: mpsc::Receiver<TimerCommand>, mut observer: F) -> Self
    where
        F: FnMut(&TimerEngine, &[TimerEffect]),
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.engine.is_running() {
                        continue;
                    }
                    match self.handle(TimerEvent::Tick) {
                        Ok(effects) => observer(&self.engine, &effects),
                        Err(e) => warn!("Tick failed: {}", e),
                    }
                }
                command = commands.recv() => {
                    let Some(event) = command.and_then(TimerCommand::into_event) else {
                        break;
                    };
                    let was_running = self.engine.is_running();
                    match self.handle(event) {
                        Ok(effects) => observer(&self.engine, &effects),
                        Err(e) => warn!("Ignoring {:?}: {}", event, e),
                    }
                    // A fresh start gets a full first second.
                    if !was_running && self.engine.is_running() {
                        ticker.reset();
                    }
                }
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPomodoroSession;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<NewPomodoroSession>>>);

    impl RecordingSink {
        fn sessions(&self) -> Vec<NewPomodoroSession> {
            self.0.lock().unwrap().clone()
        }
    }

    impl SessionSink for RecordingSink {
        fn dispatch(&self, session: NewPomodoroSession) {
            self.0.lock().unwrap().push(session);
        }
    }

    #[test]
    fn completed_work_interval_is_dispatched_once() {
        let sink = RecordingSink::default();
        let mut controller = TimerController::new(42, Durations::default(), sink.clone());

        controller.handle(TimerEvent::Start).unwrap();
        for _ in 0..1500 {
            controller.handle(TimerEvent::Tick).unwrap();
        }

        assert_eq!(controller.engine().mode(), Mode::Short);
        assert_eq!(controller.engine().remaining_seconds(), 300);
        let sessions = sink.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].user_id, 42);
        assert_eq!(sessions[0].mode, Mode::Work);
        assert_eq!(sessions[0].duration_seconds, 1500);
    }

    #[test]
    fn invalid_duration_leaves_sink_untouched() {
        let sink = RecordingSink::default();
        let mut controller = TimerController::new(1, Durations::default(), sink.clone());
        assert!(controller
            .handle(TimerEvent::SetDuration { mode: Mode::Work, minutes: 0 })
            .is_err());
        assert!(sink.sessions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_ticks_and_stops_on_shutdown() {
        let sink = RecordingSink::default();
        let controller = TimerController::new(7, Durations::new(1, 1, 1).unwrap(), sink.clone());
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(controller.run(Duration::from_secs(1), rx, |_, _| {}));
        tx.send(TimerCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;
        tx.send(TimerCommand::Shutdown).await.unwrap();

        let controller = handle.await.unwrap();
        assert_eq!(controller.engine().mode(), Mode::Short);
        assert_eq!(sink.sessions().len(), 1);
        assert_eq!(sink.sessions()[0].user_id, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_comes_a_full_period_after_start() {
        let controller = TimerController::new(7, Durations::default(), RecordingSink::default());
        let (tx, rx) = mpsc::channel(8);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();

        let handle = tokio::spawn(controller.run(Duration::from_secs(1), rx, move |engine, _| {
            record.lock().unwrap().push(engine.remaining_seconds());
        }));
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(TimerCommand::Start).await.unwrap();

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(*seen.lock().unwrap(), vec![1500]);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*seen.lock().unwrap(), vec![1500, 1499]);

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn paused_controller_does_not_count_down() {
        let sink = RecordingSink::default();
        let controller = TimerController::new(7, Durations::new(1, 1, 1).unwrap(), sink.clone());
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(controller.run(Duration::from_secs(1), rx, |_, _| {}));
        tokio::time::sleep(Duration::from_secs(120)).await;
        drop(tx);

        let controller = handle.await.unwrap();
        assert_eq!(controller.engine().remaining_seconds(), 60);
        assert!(sink.sessions().is_empty());
    }
}
