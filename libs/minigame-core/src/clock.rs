//! Countdown clock for timed sessions.
//!
//! A pure counter: the presentation layer owns the real 1 Hz driver and
//! calls [`SessionClock::tick`] once per second. Restarting a session bumps
//! the clock generation, so a stale driver left over from a superseded
//! screen cannot tick the new session (see [`SessionClock::tick_if`]).

use serde::{Deserialize, Serialize};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tick {
    /// Clock is running; remaining seconds after the decrement.
    Running(u32),
    /// This tick moved remaining to 0. Reported exactly once.
    Expired,
    /// Clock is idle, cancelled, or already expired.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Idle,
    Running,
    Expired,
    Cancelled,
}

/// One-tick-per-second countdown with one-shot expiry.
#[derive(Debug, Clone)]
pub struct SessionClock {
    remaining: u32,
    state: ClockState,
    generation: u64,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            remaining: 0,
            state: ClockState::Idle,
            generation: 0,
        }
    }

    /// Start (or restart) the countdown. Returns the new generation; ticks
    /// carrying an older generation are ignored from here on.
    ///
    /// A zero-second window expires immediately; it could never reach 0 by
    /// decrementing.
    pub fn start(&mut self, duration_secs: u32) -> u64 {
        self.generation += 1;
        self.remaining = duration_secs;
        self.state = if duration_secs == 0 {
            ClockState::Expired
        } else {
            ClockState::Running
        };
        self.generation
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> Tick {
        match self.state {
            ClockState::Running => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = ClockState::Expired;
                    Tick::Expired
                } else {
                    Tick::Running(self.remaining)
                }
            }
            _ => Tick::Ignored,
        }
    }

    /// Advance the clock only if `generation` is current.
    pub fn tick_if(&mut self, generation: u64) -> Tick {
        if generation != self.generation {
            return Tick::Ignored;
        }
        self.tick()
    }

    /// Stop the countdown. Idempotent; an expired clock stays expired.
    pub fn cancel(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Cancelled;
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn is_expired(&self) -> bool {
        self.state == ClockState::Expired
    }

    /// Generation of the most recent `start`.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
