use events::FundsRejection;
use std::sync::Mutex;

/// Receives every refusal a validator makes.
///
/// Injected at construction so the decision logic stays free of a global
/// logger and tests can capture exactly what was reported.
pub trait RejectionSink: Send + Sync {
    fn reject(&self, rejection: &FundsRejection);
}

/// Reports refusals as structured `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl RejectionSink for TracingSink {
    fn reject(&self, rejection: &FundsRejection) {
        match rejection {
            FundsRejection::Shortfall(shortfall) => tracing::warn!(
                instrument_id = %shortfall.instrument_id,
                account_type = %shortfall.account_type,
                required = %shortfall.required,
                available = %shortfall.available,
                "{}",
                shortfall
            ),
            FundsRejection::EnvironmentUnavailable {
                instrument_id,
                reason,
            } => tracing::warn!(
                instrument_id = %instrument_id,
                reason = %reason,
                "{}",
                rejection
            ),
        }
    }
}

/// Keeps refusals in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct RecordingSink {
    rejections: Mutex<Vec<FundsRejection>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<FundsRejection> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FundsRejection>> {
        // A panic while holding the lock cannot leave a Vec half-written.
        self.rejections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RejectionSink for RecordingSink {
    fn reject(&self, rejection: &FundsRejection) {
        self.lock().push(rejection.clone());
    }
}
