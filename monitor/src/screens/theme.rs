//! Theme watcher: tracks the backend-controlled UI theme.
//!
//! Unlike the screens this is change-driven, not refresh-driven: it polls
//! fast but only surfaces a value when the active theme actually differs
//! from the one in effect, so consumers re-style exactly once per switch.

use floodnet::Client;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ThemeWatcher {
    current: Option<String>,
}

impl ThemeWatcher {
    pub fn new() -> Self {
        ThemeWatcher::default()
    }

    /// The theme in effect, once one has been seen.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Polls the backend once. `Some` iff the active theme differs from
    /// the one in effect. A failed poll keeps the current theme.
    pub async fn poll(&mut self, api: &Client) -> Option<String> {
        match api.active_theme().await {
            Ok(theme) => self.observe(theme.name),
            Err(err) => {
                debug!(%err, "theme poll failed, keeping current theme");
                None
            }
        }
    }

    fn observe(&mut self, name: String) -> Option<String> {
        if self.current.as_deref() == Some(name.as_str()) {
            return None;
        }
        self.current = Some(name.clone());
        Some(name)
    }
}
