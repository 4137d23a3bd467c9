use serde::{Deserialize, Serialize};

use crate::core::RenderId;
use crate::error::{ExportError, ExportResult};

use super::ReadySource;

/// Percentages reserved around the per-artifact span.
///
/// `base` covers planning and mounting; `100 - base - range` covers
/// finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPolicy {
    #[serde(default = "default_base")]
    pub base: u8,
    #[serde(default = "default_range")]
    pub range: u8,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            base: default_base(),
            range: default_range(),
        }
    }
}

impl ProgressPolicy {
    pub fn validate(self) -> ExportResult<()> {
        if u16::from(self.base) + u16::from(self.range) > 100 {
            return Err(ExportError::InvalidConfig(format!(
                "progress base ({}) + range ({}) must not exceed 100",
                self.base, self.range
            )));
        }
        Ok(())
    }
}

fn default_base() -> u8 {
    10
}

fn default_range() -> u8 {
    80
}

/// `base + floor(processed / total * range)`, clamped to 100.
#[must_use]
pub fn progress_percent(policy: ProgressPolicy, processed: usize, total: usize) -> u8 {
    if total == 0 {
        return policy.base.min(100);
    }
    let processed = processed.min(total) as u64;
    let span = processed * u64::from(policy.range) / total as u64;
    (u64::from(policy.base) + span).min(100) as u8
}

/// Monotonic progress counter for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressTracker {
    current: u8,
}

impl ProgressTracker {
    #[must_use]
    pub fn current(self) -> u8 {
        self.current
    }

    /// Raises progress to `percent`. Lower values are ignored.
    ///
    /// Returns the new value when it changed.
    pub fn advance(&mut self, percent: u8) -> Option<u8> {
        let percent = percent.min(100);
        if percent <= self.current {
            return None;
        }
        self.current = percent;
        Some(percent)
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

/// Notifications emitted while an export runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportEvent {
    Started { total: usize },
    Progress { percent: u8 },
    ArtifactReady { render_id: RenderId, source: ReadySource },
    /// Capture proceeds with whatever is painted.
    ArtifactTimedOut { render_id: RenderId, waited_ms: u64 },
    ArtifactCaptured { render_id: RenderId, page_number: usize },
    /// Capture failed and a placeholder page was written instead.
    CaptureSkipped { render_id: RenderId, reason: String },
    Completed { page_count: usize, filename: String },
    Failed { reason: String },
    /// Progress went back to 0 once the run ended.
    ProgressReset,
}

/// Receives `ExportEvent`s in emission order.
pub trait ExportObserver: Send {
    fn on_event(&mut self, event: &ExportEvent);
}

impl<F> ExportObserver for F
where
    F: FnMut(&ExportEvent) + Send,
{
    fn on_event(&mut self, event: &ExportEvent) {
        self(event);
    }
}

/// Observer that records every event.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<ExportEvent>,
}

impl EventLog {
    #[must_use]
    pub fn events(&self) -> &[ExportEvent] {
        &self.events
    }

    /// Reported percentages, with a reset recorded as 0.
    #[must_use]
    pub fn percentages(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ExportEvent::Progress { percent } => Some(*percent),
                ExportEvent::ProgressReset => Some(0),
                _ => None,
            })
            .collect()
    }
}

impl ExportObserver for EventLog {
    fn on_event(&mut self, event: &ExportEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgressPolicy, ProgressTracker, progress_percent};

    #[test]
    fn percent_spans_base_to_base_plus_range() {
        let policy = ProgressPolicy::default();
        assert_eq!(progress_percent(policy, 0, 3), 10);
        assert_eq!(progress_percent(policy, 1, 3), 36);
        assert_eq!(progress_percent(policy, 2, 3), 63);
        assert_eq!(progress_percent(policy, 3, 3), 90);
        assert_eq!(progress_percent(policy, 7, 3), 90);
    }

    #[test]
    fn tracker_never_goes_backwards() {
        let mut tracker = ProgressTracker::default();
        assert_eq!(tracker.advance(40), Some(40));
        assert_eq!(tracker.advance(20), None);
        assert_eq!(tracker.advance(40), None);
        assert_eq!(tracker.current(), 40);
        tracker.reset();
        assert_eq!(tracker.current(), 0);
    }

    #[test]
    fn base_plus_range_is_bounded() {
        let policy = ProgressPolicy {
            base: 30,
            range: 80,
        };
        assert!(policy.validate().is_err());
    }
}
