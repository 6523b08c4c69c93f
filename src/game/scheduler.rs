//! Round timers
//!
//! The session never sleeps. It asks a [`Scheduler`] to post [`TimerEvent`]s
//! back into its own command queue, so timer callbacks are serialized with
//! every other event. Each event carries the id of the round it belongs to,
//! letting the session drop callbacks that were already queued when their
//! round was superseded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

use crate::game::session::SessionCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    HintReveal,
    Countdown,
    NextRound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub round: u64,
}

impl TimerEvent {
    pub fn new(kind: TimerKind, round: u64) -> Self {
        Self { kind, round }
    }
}

/// At most one timer per kind is live; scheduling a kind replaces the old one.
pub trait Scheduler: Send {
    fn schedule_repeating(&mut self, event: TimerEvent, period: Duration);
    fn schedule_once(&mut self, event: TimerEvent, delay: Duration);
    fn cancel(&mut self, kind: TimerKind);
}

/// Timers as tokio tasks feeding the session queue
pub struct TokioScheduler {
    tx: UnboundedSender<SessionCommand>,
    tasks: HashMap<TimerKind, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tx: UnboundedSender<SessionCommand>) -> Self {
        Self {
            tx,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, event: TimerEvent, period: Duration) {
        self.cancel(event.kind);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if tx.send(SessionCommand::Timer(event)).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(event.kind, handle);
    }

    fn schedule_once(&mut self, event: TimerEvent, delay: Duration) {
        self.cancel(event.kind);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(SessionCommand::Timer(event));
        });
        self.tasks.insert(event.kind, handle);
    }

    fn cancel(&mut self, kind: TimerKind) {
        if let Some(handle) = self.tasks.remove(&kind) {
            debug!("Cancelling {:?} timer", kind);
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

/// A timer registered with a [`ManualScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub event: TimerEvent,
    /// Period for repeating timers, delay for one-shots
    pub after: Duration,
    pub repeating: bool,
}

/// Scheduler that only records requests; callers fire timers by hand.
///
/// Clones share state, so a test can keep one handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    timers: Arc<Mutex<HashMap<TimerKind, Scheduled>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TimerKind) -> Option<Scheduled> {
        self.timers
            .lock()
            .ok()
            .and_then(|timers| timers.get(&kind).copied())
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.get(kind).is_some()
    }

    /// Event to deliver for `kind`. One-shot timers are consumed.
    pub fn fire(&self, kind: TimerKind) -> Option<TimerEvent> {
        let mut timers = self.timers.lock().ok()?;
        let scheduled = timers.get(&kind).copied()?;
        if !scheduled.repeating {
            timers.remove(&kind);
        }
        Some(scheduled.event)
    }

    fn insert(&self, scheduled: Scheduled) {
        if let Ok(mut timers) = self.timers.lock() {
            timers.insert(scheduled.event.kind, scheduled);
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, event: TimerEvent, period: Duration) {
        self.insert(Scheduled {
            event,
            after: period,
            repeating: true,
        });
    }

    fn schedule_once(&mut self, event: TimerEvent, delay: Duration) {
        self.insert(Scheduled {
            event,
            after: delay,
            repeating: false,
        });
    }

    fn cancel(&mut self, kind: TimerKind) {
        if let Ok(mut timers) = self.timers.lock() {
            timers.remove(&kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_repeating_timer_posts_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let event = TimerEvent::new(TimerKind::Countdown, 3);

        scheduler.schedule_repeating(event, Duration::from_secs(1));

        for _ in 0..3 {
            match rx.recv().await {
                Some(SessionCommand::Timer(received)) => assert_eq!(received, event),
                other => panic!("Expected timer event, got {:?}", other),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        scheduler.schedule_once(
            TimerEvent::new(TimerKind::NextRound, 1),
            Duration::from_secs(5),
        );
        scheduler.cancel(TimerKind::NextRound);

        sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_replaces_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        scheduler.schedule_once(
            TimerEvent::new(TimerKind::NextRound, 1),
            Duration::from_secs(5),
        );
        scheduler.schedule_once(
            TimerEvent::new(TimerKind::NextRound, 2),
            Duration::from_secs(5),
        );

        match rx.recv().await {
            Some(SessionCommand::Timer(event)) => assert_eq!(event.round, 2),
            other => panic!("Expected timer event, got {:?}", other),
        }
        sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_manual_scheduler_fire() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.clone();

        scheduler.schedule_repeating(
            TimerEvent::new(TimerKind::HintReveal, 1),
            Duration::from_secs(20),
        );
        scheduler.schedule_once(
            TimerEvent::new(TimerKind::NextRound, 1),
            Duration::from_secs(5),
        );

        assert_eq!(handle.get(TimerKind::HintReveal).unwrap().after, Duration::from_secs(20));
        assert!(handle.fire(TimerKind::HintReveal).is_some());
        assert!(handle.is_scheduled(TimerKind::HintReveal));

        assert!(handle.fire(TimerKind::NextRound).is_some());
        assert!(!handle.is_scheduled(TimerKind::NextRound));

        scheduler.cancel(TimerKind::HintReveal);
        assert!(handle.fire(TimerKind::HintReveal).is_none());
    }
}
