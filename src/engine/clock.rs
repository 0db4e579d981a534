//! Cancellable countdowns delivered as timeout events.
//!
//! The engine never sleeps. Starting a countdown hands out a
//! [`TimerToken`]; the host schedules the wakeup and feeds the token back.
//! Only the token of the most recent, still-running countdown is honoured,
//! so a late wakeup from a superseded timer or session does nothing.

use std::time::{Duration, Instant};

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub session: Uuid,
    pub generation: u64,
}

#[derive(Debug)]
struct Running {
    generation: u64,
    started: Instant,
    duration: Duration,
}

#[derive(Debug)]
pub struct Countdown {
    session: Uuid,
    generation: u64,
    running: Option<Running>,
}

impl Countdown {
    pub fn new(session: Uuid) -> Self {
        Self {
            session,
            generation: 0,
            running: None,
        }
    }

    /// Start a countdown, cancelling any previous one.
    pub fn start(&mut self, duration: Duration) -> TimerToken {
        self.generation += 1;
        self.running = Some(Running {
            generation: self.generation,
            started: Instant::now(),
            duration,
        });
        TimerToken {
            session: self.session,
            generation: self.generation,
        }
    }

    pub fn cancel(&mut self) {
        self.running = None;
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn is_current(&self, token: TimerToken) -> bool {
        token.session == self.session
            && self
                .running
                .as_ref()
                .is_some_and(|r| r.generation == token.generation)
    }

    /// Consume a timeout. Returns `false` for stale tokens.
    pub fn expire(&mut self, token: TimerToken) -> bool {
        if self.is_current(token) {
            self.running = None;
            true
        } else {
            false
        }
    }

    /// Time left, or `None` when no countdown is running.
    pub fn remaining(&self) -> Option<Duration> {
        self.running
            .as_ref()
            .map(|r| r.duration.saturating_sub(r.started.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_invalidates_previous_token() {
        let mut clock = Countdown::new(Uuid::new_v4());
        let first = clock.start(Duration::from_secs(20));
        let second = clock.start(Duration::from_secs(20));

        assert!(!clock.expire(first));
        assert!(clock.is_running());
        assert!(clock.expire(second));
        assert!(!clock.is_running());
        assert!(!clock.expire(second));
    }

    #[test]
    fn test_cancel() {
        let mut clock = Countdown::new(Uuid::new_v4());
        let token = clock.start(Duration::from_secs(5));
        clock.cancel();
        assert!(!clock.expire(token));
        assert_eq!(clock.remaining(), None);
    }

    #[test]
    fn test_other_session_token_ignored() {
        let mut clock = Countdown::new(Uuid::new_v4());
        let token = clock.start(Duration::from_secs(5));
        let foreign = TimerToken {
            session: Uuid::new_v4(),
            ..token
        };
        assert!(!clock.expire(foreign));
        assert!(clock.remaining().unwrap() <= Duration::from_secs(5));
    }
}
