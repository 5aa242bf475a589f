use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cooperative cancellation flag shared between a running engine and its
/// host. Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Re-arm the token for the next run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Outcome of a suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Resume,
    Cancelled,
}

/// The engine's two suspension points, in host hands.
///
/// `yield_for_render` runs before each worklist item so the renderer can
/// flush the previous step's frames; `delay` runs after, for the configured
/// playback speed. Both must observe cancellation: once either returns
/// [`Step::Cancelled`] the engine stops without emitting further frames.
pub trait Scheduler {
    fn yield_for_render(&mut self) -> Step;
    fn delay(&mut self, duration: Duration) -> Step;
}

/// A scheduler that never waits. Collapses a run into a tight synchronous
/// loop while still honoring the cancel token; the default for tests and
/// benches.
#[derive(Debug, Clone, Default)]
pub struct NoDelay {
    token: CancelToken,
}

impl NoDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancelToken) -> Self {
        Self { token }
    }

    fn check(&self) -> Step {
        if self.token.is_cancelled() {
            Step::Cancelled
        } else {
            Step::Resume
        }
    }
}

impl Scheduler for NoDelay {
    fn yield_for_render(&mut self) -> Step {
        self.check()
    }

    fn delay(&mut self, _duration: Duration) -> Step {
        self.check()
    }
}

/// Real-time scheduler for native hosts: sleeps out the playback delay on the
/// current thread. The sleep is sliced so a cancel from another thread lands
/// within [`ThreadScheduler::SLICE`] rather than after the full delay.
#[derive(Debug, Clone)]
pub struct ThreadScheduler {
    token: CancelToken,
}

impl ThreadScheduler {
    const SLICE: Duration = Duration::from_millis(10);

    pub fn new(token: CancelToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

impl Scheduler for ThreadScheduler {
    fn yield_for_render(&mut self) -> Step {
        if self.token.is_cancelled() {
            Step::Cancelled
        } else {
            std::thread::yield_now();
            Step::Resume
        }
    }

    fn delay(&mut self, duration: Duration) -> Step {
        let mut remaining = duration;
        loop {
            if self.token.is_cancelled() {
                return Step::Cancelled;
            }
            if remaining.is_zero() {
                return Step::Resume;
            }
            let slice = remaining.min(Self::SLICE);
            std::thread::sleep(slice);
            remaining -= slice;
        }
    }
}
