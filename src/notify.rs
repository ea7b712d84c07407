//! Host-facing side channels: warning notifications and cooperative progress.
//!
//! Warnings are accumulated into a [`WarningBatch`] and flushed in one go; a
//! non-empty batch is terminated by a single [`Notifier::done`] call. Progress
//! reporting doubles as the cancellation signal: any `false` returned by a
//! [`Progress`] method means the operator asked to stop.

use std::fmt;

/// Message sent as the end-of-batch sentinel.
pub const DONE_MESSAGE: &str = "done!";

/// Soft problems found while preparing an export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportWarning {
    /// Two periodic domains share the same `(instance, type)` key.
    DuplicatePeriodic {
        name: String,
        type_id: u32,
        instance_id: u32,
    },
    /// A periodic domain has no partner of the opposite role.
    UnmatchedPeriodic {
        name: String,
        type_id: u32,
        instance_id: u32,
    },
    /// Volume blocks carry different non-zero condition types.
    MixedVolumeTypes,
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportWarning::DuplicatePeriodic {
                name,
                type_id,
                instance_id,
            } => write!(
                f,
                "PERIODIC FACE '{name}' ({type_id}:{instance_id}) is a duplicate"
            ),
            ExportWarning::UnmatchedPeriodic {
                name,
                type_id,
                instance_id,
            } => write!(
                f,
                "PERIODIC FACE '{name}' ({type_id}:{instance_id}) does not have a match"
            ),
            ExportWarning::MixedVolumeTypes => f.write_str("This export contains mixed VC types!"),
        }
    }
}

/// Receiver for warnings and errors raised during an export.
pub trait Notifier {
    /// A warning; `id` counts up from 1 within a batch.
    fn warning(&mut self, id: u32, message: &str);

    /// A fatal error.
    fn error(&mut self, id: u32, message: &str);

    /// End of a warning batch.
    fn done(&mut self) {
        self.warning(0, DONE_MESSAGE);
    }
}

/// Forwards notifications to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warning(&mut self, id: u32, message: &str) {
        log::warn!("[{id}] {message}");
    }

    fn error(&mut self, id: u32, message: &str) {
        log::error!("[{id}] {message}");
    }

    fn done(&mut self) {
        log::debug!("{DONE_MESSAGE}");
    }
}

/// Keeps every notification, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectingNotifier {
    pub warnings: Vec<(u32, String)>,
    pub errors: Vec<(u32, String)>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warning messages without ids, excluding the done sentinel.
    pub fn messages(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .filter(|(id, _)| *id != 0)
            .map(|(_, msg)| msg.as_str())
            .collect()
    }

    /// Number of done sentinels received.
    pub fn done_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|(id, msg)| *id == 0 && msg == DONE_MESSAGE)
            .count()
    }
}

impl Notifier for CollectingNotifier {
    fn warning(&mut self, id: u32, message: &str) {
        self.warnings.push((id, message.to_string()));
    }

    fn error(&mut self, id: u32, message: &str) {
        self.errors.push((id, message.to_string()));
    }
}

/// Ordered warnings awaiting a flush.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarningBatch {
    warnings: Vec<ExportWarning>,
}

impl WarningBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: ExportWarning) {
        self.warnings.push(warning);
    }

    pub fn extend<I: IntoIterator<Item = ExportWarning>>(&mut self, warnings: I) {
        self.warnings.extend(warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportWarning> + '_ {
        self.warnings.iter()
    }

    /// Send every warning, then the done sentinel if anything was sent.
    pub fn flush<N: Notifier + ?Sized>(&self, notifier: &mut N) {
        for (idx, warning) in self.warnings.iter().enumerate() {
            notifier.warning(idx as u32 + 1, &warning.to_string());
        }
        if !self.warnings.is_empty() {
            notifier.done();
        }
    }
}

/// Progress sink that may request cancellation.
pub trait Progress {
    /// Announce the number of major steps. `false` aborts.
    fn begin(&mut self, _major_steps: u32) -> bool {
        true
    }

    /// Start a step of `total` items. `false` aborts.
    fn begin_step(&mut self, total: usize) -> bool;

    /// One item done. `false` aborts.
    fn increment(&mut self) -> bool;

    /// Close the current step.
    fn end_step(&mut self) {}
}

/// Progress sink that never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn begin_step(&mut self, _total: usize) -> bool {
        true
    }

    fn increment(&mut self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages_match_host_wording() {
        let dup = ExportWarning::DuplicatePeriodic {
            name: "per-a".into(),
            type_id: 13,
            instance_id: 2,
        };
        assert_eq!(dup.to_string(), "PERIODIC FACE 'per-a' (13:2) is a duplicate");
        let unmatched = ExportWarning::UnmatchedPeriodic {
            name: "shadow".into(),
            type_id: 14,
            instance_id: 9,
        };
        assert_eq!(
            unmatched.to_string(),
            "PERIODIC FACE 'shadow' (14:9) does not have a match"
        );
    }

    #[test]
    fn flush_numbers_warnings_and_terminates_batch() {
        let mut batch = WarningBatch::new();
        batch.push(ExportWarning::MixedVolumeTypes);
        batch.push(ExportWarning::MixedVolumeTypes);
        let mut sink = CollectingNotifier::new();
        batch.flush(&mut sink);
        let ids: Vec<u32> = sink.warnings.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert_eq!(sink.done_count(), 1);
    }

    #[test]
    fn empty_batch_sends_nothing() {
        let mut sink = CollectingNotifier::new();
        WarningBatch::new().flush(&mut sink);
        assert!(sink.warnings.is_empty());
    }
}
