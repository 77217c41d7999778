//! Display sink for decoded frames
//!
//! Each inbound binary message becomes one [`FrameHandle`] wrapping the JPEG
//! bytes. The sink installs the handle as its current image source; the
//! previously installed handle is released the moment it is replaced, and
//! the last one is released at teardown via [`FrameSink::clear`]. Releases
//! are observable through a shared [`ReleaseCounter`], which is how the
//! tests pin down the one-release-per-frame guarantee.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Shared counter incremented once per released frame handle
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicU64>);

impl ReleaseCounter {
    /// Create a fresh counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles released so far
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A displayable frame
///
/// Owns the JPEG bytes of one complete frame plus its delivery sequence
/// number. Dropping the handle releases the underlying buffer; if a release
/// counter was attached, the release is recorded there.
#[derive(Debug)]
pub struct FrameHandle {
    bytes: Vec<u8>,
    seq: u64,
    releases: Option<ReleaseCounter>,
}

impl FrameHandle {
    /// Wrap one frame's bytes
    pub fn new(bytes: Vec<u8>, seq: u64) -> Self {
        Self {
            bytes,
            seq,
            releases: None,
        }
    }

    /// Attach a release counter
    pub fn with_release_counter(mut self, counter: ReleaseCounter) -> Self {
        self.releases = Some(counter);
        self
    }

    /// The JPEG payload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Delivery sequence number (transport order, starting at 0)
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if let Some(counter) = self.releases.take() {
            counter.increment();
        }
    }
}

/// Where inbound frames are displayed
///
/// `present` is invoked exactly once per inbound frame, in transport
/// delivery order. Implementations must release the previously installed
/// handle when replacing it (ownership transfer makes this automatic for
/// sinks that store the handle).
pub trait FrameSink: Send {
    /// Install `frame` as the current image source
    fn present(&mut self, frame: FrameHandle);

    /// Release the current frame, if any (teardown path)
    fn clear(&mut self);
}

/// A sink that keeps only the most recent frame
#[derive(Debug, Default)]
pub struct LatestFrameSink {
    current: Option<FrameHandle>,
    presented: u64,
}

impl LatestFrameSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed frame
    pub fn current(&self) -> Option<&FrameHandle> {
        self.current.as_ref()
    }

    /// Total frames presented over the session
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameSink for LatestFrameSink {
    fn present(&mut self, frame: FrameHandle) {
        // Replacing `current` drops (and thereby releases) the old handle
        self.current = Some(frame);
        self.presented += 1;
    }

    fn clear(&mut self) {
        self.current = None;
    }
}

// Lets callers keep a handle on the sink while the worker owns the `Box`.
impl<S: FrameSink> FrameSink for Arc<Mutex<S>> {
    fn present(&mut self, frame: FrameHandle) {
        if let Ok(mut sink) = self.lock() {
            sink.present(frame);
        }
    }

    fn clear(&mut self) {
        if let Ok(mut sink) = self.lock() {
            sink.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_replaces_and_releases() {
        let releases = ReleaseCounter::new();
        let mut sink = LatestFrameSink::new();

        sink.present(FrameHandle::new(vec![1], 0).with_release_counter(releases.clone()));
        assert_eq!(releases.count(), 0);

        sink.present(FrameHandle::new(vec![2], 1).with_release_counter(releases.clone()));
        assert_eq!(releases.count(), 1);
        assert_eq!(sink.current().unwrap().bytes(), &[2]);
        assert_eq!(sink.presented(), 2);
    }

    #[test]
    fn test_clear_releases_last_frame() {
        let releases = ReleaseCounter::new();
        let mut sink = LatestFrameSink::new();

        sink.present(FrameHandle::new(vec![1], 0).with_release_counter(releases.clone()));
        sink.clear();
        assert_eq!(releases.count(), 1);
        assert!(sink.current().is_none());
    }

    #[test]
    fn test_clear_on_empty_sink() {
        let mut sink = LatestFrameSink::new();
        sink.clear();
        assert_eq!(sink.presented(), 0);
    }

    #[test]
    fn test_shared_sink_presents_through_mutex() {
        let shared = Arc::new(Mutex::new(LatestFrameSink::new()));
        let mut handle = shared.clone();
        handle.present(FrameHandle::new(vec![9], 0));
        assert_eq!(shared.lock().unwrap().current().unwrap().seq(), 0);
    }

    #[test]
    fn test_handle_without_counter_drops_quietly() {
        let frame = FrameHandle::new(vec![1, 2], 7);
        assert_eq!(frame.len(), 2);
        assert!(!frame.is_empty());
        drop(frame);
    }
}
