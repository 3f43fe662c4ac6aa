//! Process-wide codec counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Track codec activity without external dependencies.
pub(crate) struct Metrics;

static MESSAGES_READ: AtomicU64 = AtomicU64::new(0);
static MESSAGES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static SEGMENTS_READ: AtomicU64 = AtomicU64::new(0);
static SEGMENTS_WRITTEN: AtomicU64 = AtomicU64::new(0);
static BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static INCOMPLETE_READS: AtomicU64 = AtomicU64::new(0);
static READ_ERRORS: AtomicU64 = AtomicU64::new(0);

impl Metrics {
    #[inline]
    pub(crate) fn record_segment() {
        SEGMENTS_READ.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_read() {
        MESSAGES_READ.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_incomplete() {
        INCOMPLETE_READS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_error() {
        READ_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(segments: usize, bytes: usize) {
        MESSAGES_WRITTEN.fetch_add(1, Ordering::Relaxed);
        SEGMENTS_WRITTEN.fetch_add(saturating_u64(segments), Ordering::Relaxed);
        BYTES_WRITTEN.fetch_add(saturating_u64(bytes), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        MetricsSnapshot {
            messages_read: MESSAGES_READ.load(Ordering::Relaxed),
            messages_written: MESSAGES_WRITTEN.load(Ordering::Relaxed),
            segments_read: SEGMENTS_READ.load(Ordering::Relaxed),
            segments_written: SEGMENTS_WRITTEN.load(Ordering::Relaxed),
            bytes_written: BYTES_WRITTEN.load(Ordering::Relaxed),
            incomplete_reads: INCOMPLETE_READS.load(Ordering::Relaxed),
            read_errors: READ_ERRORS.load(Ordering::Relaxed),
        }
    }
}

fn saturating_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Snapshot of codec counters since process start.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Messages completed by the reader
    pub messages_read: u64,
    /// Messages serialized by the writer
    pub messages_written: u64,
    /// Segments parsed
    pub segments_read: u64,
    /// Segments serialized
    pub segments_written: u64,
    /// Bytes produced by the writer
    pub bytes_written: u64,
    /// Reads that handed back a continuation
    pub incomplete_reads: u64,
    /// Reads that failed
    pub read_errors: u64,
}

impl MetricsSnapshot {
    /// Average segments per completed message
    #[must_use]
    pub fn avg_segments_per_message(&self) -> Option<u64> {
        if self.messages_read == 0 {
            return None;
        }
        Some(self.segments_read / self.messages_read)
    }
}

/// Current counter values
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    Metrics::totals()
}
