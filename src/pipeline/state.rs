//! Run lifecycle.

use std::fmt;

/// Lifecycle of one export run.
///
/// `Idle -> Decoding -> Dispatching -> Draining -> Done`, with `Failed`
/// reachable from any active state. There is no way back out of `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    /// Records are being decoded, filtered, batched and queued
    Decoding,
    /// The source is exhausted; only queued deliveries remain
    Dispatching,
    /// The queue is closed and the run is waiting on the workers
    Draining,
    Done,
    Failed,
}

impl PipelineState {
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Decoding)
                | (Decoding, Dispatching)
                | (Dispatching, Draining)
                | (Draining, Done)
                | (Decoding | Dispatching | Draining, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Moves to `next`, logging the transition. Illegal transitions are
    /// logged and ignored.
    pub fn advance(&mut self, next: PipelineState) {
        if !self.can_transition_to(next) {
            log::warn!("Ignoring illegal pipeline transition {} -> {}", self, next);
            return;
        }
        log::debug!("Pipeline state {} -> {}", self, next);
        *self = next;
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Decoding => "decoding",
            PipelineState::Dispatching => "dispatching",
            PipelineState::Draining => "draining",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}
