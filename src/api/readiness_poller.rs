use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::error::{ExportError, ExportResult};
use crate::surface::VisualElement;

/// Timing and heuristics for deciding when a mounted widget has finished loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Heuristic readiness is ignored before this much time has passed.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
    /// Case-insensitive text fragments that mean the widget is still loading.
    #[serde(default = "default_loading_fragments")]
    pub loading_fragments: Vec<String>,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            grace_period_ms: default_grace_period_ms(),
            max_wait_ms: default_max_wait_ms(),
            loading_fragments: default_loading_fragments(),
        }
    }
}

impl ReadinessPolicy {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    #[must_use]
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn validate(&self) -> ExportResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(ExportError::InvalidConfig(
                "readiness poll interval must be > 0".to_owned(),
            ));
        }
        if self.grace_period_ms > self.max_wait_ms {
            return Err(ExportError::InvalidConfig(format!(
                "readiness grace period ({} ms) exceeds max wait ({} ms)",
                self.grace_period_ms, self.max_wait_ms
            )));
        }
        if self.loading_fragments.iter().any(|fragment| fragment.trim().is_empty()) {
            return Err(ExportError::InvalidConfig(
                "loading text fragments must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn mentions_loading(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.loading_fragments
            .iter()
            .any(|fragment| text.contains(&fragment.to_lowercase()))
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_grace_period_ms() -> u64 {
    1_500
}

fn default_max_wait_ms() -> u64 {
    30_000
}

fn default_loading_fragments() -> Vec<String> {
    ["loading", "calculating", "generating"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Which signal declared the widget ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadySource {
    Marker,
    Signal,
    Heuristic,
}

/// Terminal state of one artifact's readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessOutcome {
    Ready { source: ReadySource, waited: Duration },
    TimedOut { waited: Duration },
}

impl ReadinessOutcome {
    #[must_use]
    pub fn is_timed_out(self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Single readiness check at `elapsed` since polling started.
///
/// The explicit marker or signal wins immediately. The heuristic (no spinner
/// and no loading text) only counts once the grace period has passed.
#[must_use]
pub fn probe_readiness(
    element: &dyn VisualElement,
    signal: Option<&watch::Receiver<bool>>,
    elapsed: Duration,
    policy: &ReadinessPolicy,
) -> Option<ReadySource> {
    if element.has_ready_marker() {
        return Some(ReadySource::Marker);
    }
    if signal.is_some_and(|receiver| *receiver.borrow()) {
        return Some(ReadySource::Signal);
    }
    if elapsed >= policy.grace_period()
        && !element.has_busy_indicator()
        && !policy.mentions_loading(&element.text_content())
    {
        return Some(ReadySource::Heuristic);
    }
    None
}

/// Waits until `element` is ready or the policy's max wait elapses.
///
/// Timing out is not an error: the caller captures whatever is painted.
/// Only cancellation ends the wait with an error.
pub async fn wait_until_ready(
    element: &dyn VisualElement,
    policy: &ReadinessPolicy,
    cancel: &CancellationToken,
) -> ExportResult<ReadinessOutcome> {
    let started = Instant::now();
    let mut signal = element.readiness_signal();

    loop {
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        let elapsed = started.elapsed();
        if let Some(source) = probe_readiness(element, signal.as_ref(), elapsed, policy) {
            trace!(
                render_id = %element.render_id(),
                ?source,
                waited_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "element ready"
            );
            return Ok(ReadinessOutcome::Ready {
                source,
                waited: elapsed,
            });
        }

        let max_wait = policy.max_wait();
        if elapsed >= max_wait {
            warn!(
                render_id = %element.render_id(),
                waited_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "element never signalled readiness; capturing current paint"
            );
            return Ok(ReadinessOutcome::TimedOut { waited: elapsed });
        }

        let tick = policy.poll_interval().min(max_wait - elapsed);
        tokio::select! {
            () = cancel.cancelled() => return Err(ExportError::Cancelled),
            () = sleep(tick) => {}
            () = signal_changed(&mut signal) => {}
        }
    }
}

async fn signal_changed(signal: &mut Option<watch::Receiver<bool>>) {
    let Some(receiver) = signal.as_mut() else {
        return std::future::pending().await;
    };
    if receiver.changed().await.is_err() {
        // Sender is gone; the last value stays readable, only ticks wake us now.
        std::future::pending::<()>().await;
    }
}
