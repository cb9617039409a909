use std::fmt;

/// Phases reported through progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPhase {
    /// Asking the server how many bytes it already holds.
    #[default]
    Negotiating,

    /// Sending chunks.
    Transferring,

    /// Waiting out a retry delay after a transient failure.
    Retrying,

    /// The server acknowledged the full byte range.
    Completed,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferPhase::Negotiating => write!(f, "Negotiating"),
            TransferPhase::Transferring => write!(f, "Transferring"),
            TransferPhase::Retrying => write!(f, "Retrying"),
            TransferPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Snapshot of a transfer, passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub phase: TransferPhase,

    /// Bytes the server has acknowledged.
    pub bytes_sent: u64,

    pub bytes_total: u64,

    /// Retries spent since the last acknowledged chunk.
    pub retry_count: u32,
}

impl Progress {
    pub fn new(phase: TransferPhase, bytes_sent: u64, bytes_total: u64) -> Self {
        Self {
            phase,
            bytes_sent,
            bytes_total,
            retry_count: 0,
        }
    }

    /// Completion in percent, clamped to `[0, 100]`.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.bytes_total == 0 {
            // Nothing to send: done only once the server said so.
            return if self.is_completed() { 100.0 } else { 0.0 };
        }
        let pct = self.bytes_sent as f64 / self.bytes_total as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    /// Rounded percentage for display.
    #[must_use]
    pub fn display_percent(&self) -> u8 {
        self.percentage().round() as u8
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == TransferPhase::Completed
    }

    #[must_use]
    pub fn is_retrying(&self) -> bool {
        self.retry_count > 0
    }
}
