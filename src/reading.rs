//! Sustained-reading detection from on-device text recognition results.
//!
//! The camera and recognizer are external collaborators; the engine only sees
//! per-frame character and line counts. A dedicated worker consumes frames
//! serially from a bounded channel, latches on the first frame that looks
//! like a page of text, and ignores everything after. Each frame value is
//! dropped after analysis regardless of outcome.

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::thread::{self, JoinHandle};

/// Minimum recognized characters for a frame to count as a page.
const MIN_TEXT_CHARS: usize = 50;
/// Minimum recognized text lines for a frame to count as a page.
const MIN_TEXT_LINES: usize = 5;

/// Recognized-text summary for one analyzed camera frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextDetection {
    /// Timestamp when the frame was analyzed
    pub timestamp: DateTime<Utc>,
    /// Total recognized characters in the frame
    pub char_count: usize,
    /// Recognized text lines (blocks) in the frame
    pub line_count: usize,
}

impl TextDetection {
    pub fn new(char_count: usize, line_count: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            char_count,
            line_count,
        }
    }

    /// Whether this frame looks like a page of a book.
    pub fn is_page(&self) -> bool {
        self.char_count >= MIN_TEXT_CHARS && self.line_count >= MIN_TEXT_LINES
    }
}

/// Latching page detector: reports the first qualifying frame, then stays
/// silent until reset.
#[derive(Debug, Clone, Default)]
pub struct ReadingDetector {
    detected: bool,
}

impl ReadingDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one frame. Returns true only for the first qualifying frame.
    pub fn observe(&mut self, detection: &TextDetection) -> bool {
        if self.detected || !detection.is_page() {
            return false;
        }
        self.detected = true;
        true
    }

    pub fn is_detected(&self) -> bool {
        self.detected
    }

    /// Re-arm the detector for a new reading session.
    pub fn reset(&mut self) {
        self.detected = false;
    }
}

/// Background worker that analyzes frames serially.
///
/// Frames arrive on the sender returned by [`ReadingWorker::spawn`]; the one
/// qualifying detection (if any) is delivered through [`try_detection`].
/// The worker exits when all frame senders are dropped.
///
/// [`try_detection`]: ReadingWorker::try_detection
pub struct ReadingWorker {
    detections: Receiver<TextDetection>,
    handle: Option<JoinHandle<()>>,
}

impl ReadingWorker {
    /// Spawn the worker. Returns the worker and the frame sender.
    pub fn spawn() -> (Self, Sender<TextDetection>) {
        let (frame_tx, frame_rx) = bounded::<TextDetection>(64);
        let (found_tx, found_rx) = bounded::<TextDetection>(1);

        let handle = thread::spawn(move || {
            let mut detector = ReadingDetector::new();
            for frame in frame_rx.iter() {
                if detector.observe(&frame) {
                    log::debug!(
                        "page detected: {} chars, {} lines",
                        frame.char_count,
                        frame.line_count
                    );
                    // A full channel means a previous detection was never
                    // consumed; drop this one like any other late frame.
                    let _ = found_tx.try_send(frame);
                }
                // frame dropped here, analyzed or not
            }
        });

        (
            Self {
                detections: found_rx,
                handle: Some(handle),
            },
            frame_tx,
        )
    }

    /// Take the qualifying detection, if one has been found.
    pub fn try_detection(&self) -> Option<TextDetection> {
        self.detections.try_recv().ok()
    }

    /// Wait for the worker to finish. Call after dropping the frame sender.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_page_thresholds() {
        assert!(TextDetection::new(50, 5).is_page());
        assert!(!TextDetection::new(49, 5).is_page());
        assert!(!TextDetection::new(50, 4).is_page());
        assert!(!TextDetection::new(0, 0).is_page());
    }

    #[test]
    fn test_detector_latches_on_first_page() {
        let mut detector = ReadingDetector::new();
        assert!(!detector.observe(&TextDetection::new(10, 1)));
        assert!(detector.observe(&TextDetection::new(120, 8)));
        // Later qualifying frames are ignored
        assert!(!detector.observe(&TextDetection::new(300, 12)));
        assert!(detector.is_detected());

        detector.reset();
        assert!(detector.observe(&TextDetection::new(120, 8)));
    }

    #[test]
    fn test_worker_reports_single_detection() {
        let (worker, frames) = ReadingWorker::spawn();

        frames.send(TextDetection::new(5, 1)).unwrap();
        frames.send(TextDetection::new(200, 9)).unwrap();
        frames.send(TextDetection::new(400, 20)).unwrap();
        drop(frames);

        // Wait for the worker to drain the channel
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        let mut found = None;
        while found.is_none() && std::time::Instant::now() < deadline {
            found = worker.try_detection();
            thread::sleep(Duration::from_millis(10));
        }

        let detection = found.expect("worker never reported a detection");
        assert_eq!(detection.char_count, 200);
        // Only the first qualifying frame is reported
        assert!(worker.try_detection().is_none());
        worker.join();
    }
}
