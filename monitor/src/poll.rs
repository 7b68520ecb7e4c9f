//! Poll bookkeeping shared by every screen: the two display phases, and the
//! token guard that keeps late or superseded fetches from clobbering newer
//! state.
//!
//! Every screen has the same life cycle. It starts in [`Phase::Loading`]
//! with placeholder data. The first completed poll, success or failure,
//! moves it to [`Phase::Ready`] for good; after that a failed poll keeps
//! the previous data on display rather than blanking the screen. An outcome
//! is applied only if it carries the newest token, so a response from
//! before a refresh, or one that lands after the screen has been retired,
//! is discarded as a no-op.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use tracing::{debug, warn};

/// What a screen should show: a loading indicator, or its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// Identifies which poll attempt a fetch outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollToken {
    generation: u64,
}

/// Display state for one screen.
#[derive(Debug)]
pub struct ScreenState<T> {
    name: &'static str,
    phase: Phase,
    data: T,
    generation: u64,
    retired: bool,
    last_update: Option<DateTime<Utc>>,
}

impl<T: Default> ScreenState<T> {
    pub fn new(name: &'static str) -> Self {
        ScreenState {
            name,
            phase: Phase::Loading,
            data: T::default(),
            generation: 0,
            retired: false,
            last_update: None,
        }
    }
}

impl<T> ScreenState<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The data on display. Placeholder (default) until the first
    /// successful poll.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// When the data was last replaced. `None` until the first success.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Starts a poll attempt. The returned token supersedes every earlier
    /// one.
    pub fn begin_poll(&mut self) -> PollToken {
        self.generation += 1;
        PollToken {
            generation: self.generation,
        }
    }

    /// Applies a fetch outcome, unless a newer attempt or a retire has
    /// superseded the token. Returns true iff the data changed.
    pub fn apply<E: Display>(&mut self, token: PollToken, outcome: Result<T, E>) -> bool {
        if self.retired || token.generation != self.generation {
            debug!(screen = self.name, "dropping superseded poll result");
            return false;
        }
        match outcome {
            Ok(data) => {
                self.data = data;
                self.last_update = Some(Utc::now());
                self.phase = Phase::Ready;
                true
            }
            Err(err) => {
                warn!(screen = self.name, %err, "poll failed, keeping last data");
                self.phase = Phase::Ready;
                false
            }
        }
    }

    /// Takes the screen off the air. Any in-flight poll becomes a no-op.
    pub fn retire(&mut self) {
        self.retired = true;
        self.generation += 1;
    }
}
