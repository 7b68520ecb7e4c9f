//! The screens: each one pairs a backend fetch with a text presentation.
//!
//! A screen defines what to fetch and how to show it. [`ScreenRunner`] owns
//! everything around that: the loading-then-ready phases, the poll tokens,
//! and the refresh deadline, so every screen degrades the same way when the
//! backend misbehaves.

use std::time::{Duration, Instant};

use floodnet::{ApiError, Client};

use crate::poll::{Phase, ScreenState};
use crate::render;

pub mod flood;
pub mod history;
pub mod sensors;
pub mod theme;
pub mod traffic;
pub mod vulnerability;
pub mod zones;

/// One monitoring surface.
#[allow(async_fn_in_trait)]
pub trait Screen {
    /// What one refresh yields.
    type Data: Default;

    /// Name shown in section headers and logs.
    fn title(&self) -> &'static str;

    /// Fetches a fresh copy of the data.
    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError>;

    /// Renders the data into a block of lines.
    fn present(&self, data: &Self::Data) -> String;
}

/// A screen plus its poll bookkeeping and refresh deadline.
pub struct ScreenRunner<S: Screen> {
    screen: S,
    state: ScreenState<S::Data>,
    interval: Duration,
    next_due: Instant,
}

impl<S: Screen> ScreenRunner<S> {
    /// A runner that is due immediately, then every `interval`.
    pub fn new(screen: S, interval: Duration) -> Self {
        let state = ScreenState::new(screen.title());
        ScreenRunner {
            screen,
            state,
            interval,
            next_due: Instant::now(),
        }
    }

    pub fn due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Runs one poll cycle and reschedules. Returns true iff the data on
    /// display changed.
    pub async fn refresh(&mut self, api: &Client) -> bool {
        let token = self.state.begin_poll();
        let outcome = self.screen.fetch(api).await;
        self.next_due = Instant::now() + self.interval;
        self.state.apply(token, outcome)
    }

    /// The section block for the current state.
    pub fn render(&self) -> String {
        let mut block = render::section(self.screen.title(), self.state.last_update());
        match self.state.phase() {
            Phase::Loading => block.push_str("  loading...\n"),
            Phase::Ready => block.push_str(&self.screen.present(self.state.data())),
        }
        block
    }

    /// Takes the screen off the air; any in-flight poll becomes a no-op.
    pub fn retire(&mut self) {
        self.state.retire();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted screen: first fetch succeeds, later ones fail.
    struct Scripted {
        calls: u32,
    }

    impl Screen for Scripted {
        type Data = Vec<i32>;

        fn title(&self) -> &'static str {
            "scripted"
        }

        async fn fetch(&mut self, _api: &Client) -> Result<Self::Data, ApiError> {
            self.calls += 1;
            if self.calls == 1 {
                Ok(vec![5])
            } else {
                Err(ApiError::Status {
                    url: "http://backend/scripted".to_owned(),
                    status: reqwest::StatusCode::BAD_GATEWAY,
                })
            }
        }

        fn present(&self, data: &Self::Data) -> String {
            format!("  values {data:?}\n")
        }
    }

    #[tokio::test]
    async fn runner_loads_then_keeps_stale_data_on_failure() {
        // Never contacted; Scripted ignores it.
        let api = Client::new("http://127.0.0.1:1");
        let mut runner = ScreenRunner::new(Scripted { calls: 0 }, Duration::from_secs(60));

        assert!(runner.due(Instant::now()));
        assert!(runner.render().contains("loading"));

        assert!(runner.refresh(&api).await);
        assert!(runner.render().contains("values [5]"));
        assert!(!runner.due(Instant::now()));

        // The second fetch fails; the screen keeps showing what it had.
        assert!(!runner.refresh(&api).await);
        assert!(runner.render().contains("values [5]"));
        assert!(!runner.render().contains("loading"));
    }

    #[tokio::test]
    async fn zero_interval_runner_stays_due() {
        // The interval one-shot callers pass when they never reschedule.
        let api = Client::new("http://127.0.0.1:1");
        let mut runner = ScreenRunner::new(Scripted { calls: 0 }, Duration::ZERO);
        assert!(runner.due(Instant::now()));
        runner.refresh(&api).await;
        assert!(runner.due(Instant::now()));
        assert!(runner.render().contains("values [5]"));
    }
}
