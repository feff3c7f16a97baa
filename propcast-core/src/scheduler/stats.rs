//! Scheduler counters

/// Running totals since the scheduler was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks handled
    pub wakes: u64,
    /// Ticks skipped because the transport was not ready
    pub skipped_not_ready: u64,
    /// Payloads the transport accepted
    pub payloads_published: u64,
    /// Payloads the transport rejected
    pub publish_failures: u64,
    /// Wakes aborted because the payload outgrew its capacity
    pub overflows: u64,
    /// Property fragments inside accepted payloads
    pub fragments_sent: u64,
    /// Bytes inside accepted payloads
    pub bytes_sent: u64,
}
