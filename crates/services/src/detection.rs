//! Background frame sampling while the login screen is showing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use eco_core::model::UserId;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::camera::{Camera, FrameMatcher};

/// Default gap between two sampled frames.
pub const DEFAULT_DETECTION_INTERVAL: Duration = Duration::from_secs(2);

/// Spawns the sampling task.
#[derive(Debug, Clone, Copy)]
pub struct DetectionLoop {
    interval: Duration,
}

impl Default for DetectionLoop {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_INTERVAL)
    }
}

impl DetectionLoop {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts sampling `camera` every interval and forwards matches to
    /// `matches`. The first sample happens one interval after start.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(
        &self,
        camera: Arc<dyn Camera>,
        matcher: Arc<dyn FrameMatcher>,
        matches: UnboundedSender<UserId>,
    ) -> DetectionHandle {
        let active = Arc::new(Mutex::new(true));
        let task_active = Arc::clone(&active);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !sample_once(&task_active, camera.as_ref(), matcher.as_ref(), &matches) {
                    break;
                }
            }
            trace!("detection task exited");
        });

        debug!(interval_ms = period.as_millis(), "detection loop started");
        DetectionHandle {
            active,
            task: Some(task),
        }
    }
}

/// One tick. Returns `false` when the loop should end.
///
/// Runs entirely under the `active` lock so `stop` cannot return while a
/// match callback is in flight.
fn sample_once(
    active: &Mutex<bool>,
    camera: &dyn Camera,
    matcher: &dyn FrameMatcher,
    matches: &UnboundedSender<UserId>,
) -> bool {
    let guard = active.lock().unwrap_or_else(PoisonError::into_inner);
    if !*guard {
        return false;
    }
    let Some(frame) = camera.capture_frame() else {
        trace!("no frame available");
        return true;
    };
    match matcher.check(&frame) {
        Some(id) => matches.send(id).is_ok(),
        None => true,
    }
}

/// Owner of a running detection loop.
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct DetectionHandle {
    active: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl DetectionHandle {
    /// Stops sampling. Idempotent; no match callback runs after the first
    /// call returns.
    pub fn stop(&mut self) {
        {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            *active = false;
        }
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("detection loop stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DetectionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Frame;
    use crate::error::CameraUnavailableError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct StillCamera;

    #[async_trait::async_trait]
    impl Camera for StillCamera {
        async fn acquire(&self) -> Result<(), CameraUnavailableError> {
            Ok(())
        }

        fn capture_frame(&self) -> Option<Frame> {
            Some(Frame::new(vec![0; 16]))
        }

        fn release(&self) {}
    }

    #[derive(Default)]
    struct CountingMatcher {
        calls: AtomicUsize,
        answer: Option<UserId>,
    }

    impl FrameMatcher for CountingMatcher {
        fn check(&self, _frame: &Frame) -> Option<UserId> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn samples_every_interval_until_stopped() {
        let matcher = Arc::new(CountingMatcher::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut handle = DetectionLoop::new(Duration::from_secs(2)).start(
            Arc::new(StillCamera),
            matcher.clone(),
            tx,
        );

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 3);
        assert!(handle.is_running());

        handle.stop();
        assert!(!handle.is_running());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_twice_is_harmless() {
        let matcher = Arc::new(CountingMatcher::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut handle = DetectionLoop::default().start(Arc::new(StillCamera), matcher.clone(), tx);

        handle.stop();
        handle.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn forwards_matches() {
        let matcher = Arc::new(CountingMatcher {
            calls: AtomicUsize::new(0),
            answer: Some(UserId::new("1").unwrap()),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = DetectionLoop::new(Duration::from_secs(1)).start(
            Arc::new(StillCamera),
            matcher,
            tx,
        );

        let got = rx.recv().await.unwrap();
        assert_eq!(got.as_str(), "1");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_sampling() {
        let matcher = Arc::new(CountingMatcher::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = DetectionLoop::new(Duration::from_secs(1)).start(
            Arc::new(StillCamera),
            matcher.clone(),
            tx,
        );
        drop(handle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 0);
    }
}
