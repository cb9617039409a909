use std::time::Duration;

/// Waits before each retry: immediately, then 3, 5, 10 and 20 seconds.
pub const DEFAULT_RETRY_DELAYS: [Duration; 5] = [
    Duration::ZERO,
    Duration::from_secs(3),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(20),
];

/// The delay before retry number `retry_count` (0 = first retry), or `None`
/// once the sequence is exhausted.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use edudesk_transfer::core::retry_delay;
///
/// let delays = [Duration::ZERO, Duration::from_secs(3)];
/// assert_eq!(retry_delay(&delays, 0), Some(Duration::ZERO));
/// assert_eq!(retry_delay(&delays, 1), Some(Duration::from_secs(3)));
/// assert_eq!(retry_delay(&delays, 2), None);
/// ```
pub fn retry_delay(delays: &[Duration], retry_count: u32) -> Option<Duration> {
    delays.get(retry_count as usize).copied()
}

/// How the transfer loop reacts to an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Worth another attempt after a delay.
    Transient,
    /// The upload slot is gone; a new one is needed.
    Gone,
    /// The server refused the request; retrying will not help.
    Fatal,
}

/// `409 Conflict` (offset mismatch) and `423 Locked` are recoverable by
/// re-negotiating the offset; other client errors are not. Informational and
/// redirect responses are never part of a tus exchange.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        404 | 410 => StatusClass::Gone,
        409 | 423 => StatusClass::Transient,
        100..=199 | 300..=499 => StatusClass::Fatal,
        _ => StatusClass::Transient,
    }
}
